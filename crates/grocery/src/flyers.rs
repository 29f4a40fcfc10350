use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::GroceryError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlyerDeal {
    pub store: String,
    pub price: String,
    pub detail: String,
}

/// All deals advertised for one item keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlyerEntry {
    pub item: String,
    pub deals: Vec<FlyerDeal>,
}

/// One market's flyer week. Entry order is significant: it decides which
/// deal is reported as best.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlyerCatalog {
    pub location: String,
    pub valid_until: NaiveDate,
    #[serde(rename = "flyers")]
    pub entries: Vec<FlyerEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlyerMatch {
    pub item: String,
    pub best_deal: FlyerDeal,
    pub all_deals: Vec<FlyerDeal>,
    pub valid_until: NaiveDate,
}

impl FlyerCatalog {
    /// Deals for every entry whose keyword contains, or is contained in, the
    /// query. `location` only labels the reply; a blank one names the
    /// catalog's own market.
    pub fn check_local_flyers(&self, item_name: &str, location: &str) -> Result<FlyerMatch, GroceryError> {
        let query = item_name.trim().to_lowercase();
        if query.is_empty() {
            return Err(GroceryError::InvalidInput("item_name is required".into()));
        }

        let location = match location.trim() {
            "" => self.location.as_str(),
            other => other,
        };
        let no_deals = || GroceryError::NoDeals {
            item: item_name.to_string(),
            location: location.to_string(),
        };

        let all_deals: Vec<FlyerDeal> = self
            .entries
            .iter()
            .filter(|e| {
                let key = e.item.to_lowercase();
                key.contains(&query) || query.contains(&key)
            })
            .flat_map(|e| e.deals.iter().cloned())
            .collect();

        let best_deal = all_deals.first().cloned().ok_or_else(no_deals)?;
        tracing::info!(
            "Found {} flyer deals for '{item_name}'. Top: {} at {}",
            all_deals.len(),
            best_deal.store,
            best_deal.price
        );

        Ok(FlyerMatch {
            item: item_name.to_string(),
            best_deal,
            all_deals,
            valid_until: self.valid_until,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GroceryCatalog;

    fn flyers() -> FlyerCatalog {
        GroceryCatalog::builtin().unwrap().flyers
    }

    #[test]
    fn query_containing_key_matches() {
        let m = flyers().check_local_flyers("Chicken Breast", "Ottawa").unwrap();
        assert_eq!(m.item, "Chicken Breast");
        assert_eq!(m.all_deals.len(), 3);
        assert_eq!(m.best_deal.store, "Metro (Rideau/Glebe)");
        assert_eq!(m.valid_until.to_string(), "2026-01-21");
    }

    #[test]
    fn key_containing_query_matches() {
        let m = flyers().check_local_flyers("egg", "ottawa").unwrap();
        assert_eq!(m.best_deal.store, "Adonis (St. Laurent)");
    }

    #[test]
    fn deals_from_several_keys_are_concatenated_in_catalog_order() {
        let mut catalog = flyers();
        catalog.entries.push(FlyerEntry {
            item: "bacon bits".into(),
            deals: vec![FlyerDeal {
                store: "Farm Boy".into(),
                price: "$3.49".into(),
                detail: "Real bacon bits".into(),
            }],
        });
        let m = catalog.check_local_flyers("bacon", "Ottawa").unwrap();
        let stores: Vec<_> = m.all_deals.iter().map(|d| d.store.as_str()).collect();
        assert_eq!(stores, ["Metro", "Giant Tiger", "Farm Boy"]);
    }

    #[test]
    fn unknown_item_has_no_deals() {
        let err = flyers().check_local_flyers("truffles", "Ottawa").unwrap_err();
        assert_eq!(
            err.to_string(),
            "No active flyer deals found for truffles in Ottawa this week."
        );
    }

    #[test]
    fn location_does_not_filter_deals() {
        let m = flyers().check_local_flyers("chicken", "Toronto").unwrap();
        assert_eq!(m.best_deal.store, "Metro (Rideau/Glebe)");
    }

    #[test]
    fn location_labels_the_miss() {
        let err = flyers().check_local_flyers("truffles", "Toronto").unwrap_err();
        assert!(matches!(err, GroceryError::NoDeals { location, .. } if location == "Toronto"));
    }

    #[test]
    fn blank_location_names_catalog_market() {
        assert!(flyers().check_local_flyers("beef", " ").is_ok());
        let err = flyers().check_local_flyers("truffles", "").unwrap_err();
        assert!(matches!(err, GroceryError::NoDeals { location, .. } if location == "Ottawa"));
    }

    #[test]
    fn blank_item_is_rejected() {
        let err = flyers().check_local_flyers("   ", "Ottawa").unwrap_err();
        assert!(matches!(err, GroceryError::InvalidInput(_)));
    }

    #[test]
    fn match_serializes_for_agents() {
        let m = flyers().check_local_flyers("mushrooms", "Ottawa").unwrap();
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["valid_until"], "2026-01-21");
        assert_eq!(json["best_deal"]["price"], "$1.44");
        assert_eq!(json["all_deals"].as_array().unwrap().len(), 2);
    }
}
