use larder_core::ToolError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::flyers::FlyerCatalog;
use crate::prices::PriceTable;

const BUILTIN_CATALOG: &str = include_str!("../data/ottawa.toml");

#[derive(Debug, Error)]
pub enum GroceryError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("No active flyer deals found for {item} in {location} this week.")]
    NoDeals { item: String, location: String },
    #[error("Failed to read grocery catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse grocery catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

impl From<GroceryError> for ToolError {
    fn from(e: GroceryError) -> Self {
        match e {
            GroceryError::InvalidInput(msg) => ToolError::Input(msg),
            GroceryError::NoDeals { .. } => ToolError::NotFound(e.to_string()),
            other => ToolError::Upstream(other.to_string()),
        }
    }
}

/// Flyer deals plus regular shelf prices for one market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryCatalog {
    #[serde(flatten)]
    pub flyers: FlyerCatalog,
    pub prices: PriceTable,
}

impl GroceryCatalog {
    pub fn from_toml(toml_content: &str) -> Result<Self, GroceryError> {
        Ok(toml::from_str(toml_content)?)
    }

    /// The bundled Ottawa catalog.
    pub fn builtin() -> Result<Self, GroceryError> {
        Self::from_toml(BUILTIN_CATALOG)
    }

    pub fn load(path: &Path) -> Result<Self, GroceryError> {
        let content = std::fs::read_to_string(path).map_err(|source| GroceryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml(&content)?;
        tracing::info!(
            "Loaded grocery catalog for {} ({} flyer items, valid until {})",
            catalog.flyers.location,
            catalog.flyers.entries.len(),
            catalog.flyers.valid_until
        );
        Ok(catalog)
    }

    /// `path` when given, otherwise the bundled catalog.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, GroceryError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn builtin_catalog_parses() {
        let c = GroceryCatalog::builtin().unwrap();
        assert_eq!(c.flyers.location, "Ottawa");
        assert_eq!(c.flyers.valid_until, NaiveDate::from_ymd_opt(2026, 1, 21).unwrap());
        let keys: Vec<_> = c.flyers.entries.iter().map(|e| e.item.as_str()).collect();
        assert_eq!(keys, ["chicken", "bacon", "eggs", "potatoes", "mushrooms", "beef"]);
        assert_eq!(c.prices.items.len(), 5);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toronto.toml");
        std::fs::write(
            &path,
            r#"
            location = "Toronto"
            valid_until = "2026-02-04"

            [[flyers]]
            item = "salmon"
            deals = [{ store = "Fiesta Farms", price = "$9.99/lb", detail = "Atlantic fillets" }]

            [prices]
            note = "Toronto averages."
            fallback_estimate = "$5.00 - $7.00"
            fallback_note = "Rough guess."
            items = []
            "#,
        )
        .unwrap();

        let c = GroceryCatalog::load_or_builtin(Some(&path)).unwrap();
        assert_eq!(c.flyers.location, "Toronto");
        assert_eq!(c.flyers.entries[0].deals[0].store, "Fiesta Farms");
        assert!(c.prices.items.is_empty());
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = GroceryCatalog::load(Path::new("/nonexistent/catalog.toml")).unwrap_err();
        assert!(matches!(err, GroceryError::Read { .. }));
        assert!(matches!(ToolError::from(err), ToolError::Upstream(_)));
    }

    #[test]
    fn no_deals_maps_to_not_found() {
        let err = GroceryError::NoDeals {
            item: "truffles".into(),
            location: "Ottawa".into(),
        };
        assert_eq!(
            ToolError::from(err),
            ToolError::NotFound("No active flyer deals found for truffles in Ottawa this week.".into())
        );
    }
}
