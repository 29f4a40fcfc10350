use serde::{Deserialize, Serialize};

use crate::catalog::GroceryError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardPrice {
    pub item: String,
    pub price: String,
    pub unit: String,
}

/// Regular shelf prices, used when an item is not on sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTable {
    /// Source attribution attached to known prices.
    pub note: String,
    pub fallback_estimate: String,
    pub fallback_note: String,
    #[serde(default)]
    pub items: Vec<StandardPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PriceQuote {
    Known {
        item: String,
        estimated_price: String,
        unit: String,
        note: String,
    },
    Estimate {
        item: String,
        estimated_price: String,
        note: String,
    },
}

impl PriceQuote {
    pub fn is_estimate(&self) -> bool {
        matches!(self, PriceQuote::Estimate { .. })
    }
}

impl PriceTable {
    /// Exact (case-insensitive) lookup; anything else gets the general estimate.
    pub fn standard_price(&self, item_name: &str) -> Result<PriceQuote, GroceryError> {
        let query = item_name.trim().to_lowercase();
        if query.is_empty() {
            return Err(GroceryError::InvalidInput("item_name is required".into()));
        }

        let quote = match self.items.iter().find(|p| p.item.to_lowercase() == query) {
            Some(p) => PriceQuote::Known {
                item: item_name.to_string(),
                estimated_price: p.price.clone(),
                unit: p.unit.clone(),
                note: self.note.clone(),
            },
            None => PriceQuote::Estimate {
                item: item_name.to_string(),
                estimated_price: self.fallback_estimate.clone(),
                note: self.fallback_note.clone(),
            },
        };
        Ok(quote)
    }
}
