use serde::{Deserialize, Serialize};

use super::quantity::{Quantity, QuantityUnit};

/// One pantry line: what it is, how much, and how it is packaged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub product_name: String,
    #[serde(default)]
    pub quantity: Quantity,
    #[serde(default = "default_quantity_unit")]
    pub quantity_unit: String,
    /// Packaging descriptor such as `"dozen"` or `"500ml"`.
    #[serde(default)]
    pub unit: Option<String>,
}

fn default_quantity_unit() -> String {
    QuantityUnit::Unit.as_str().to_string()
}

impl InventoryItem {
    pub fn new(product_name: &str) -> Self {
        InventoryItem {
            product_name: product_name.to_string(),
            quantity: Quantity::one(),
            quantity_unit: default_quantity_unit(),
            unit: None,
        }
    }

    pub fn with_quantity(mut self, quantity: impl Into<Quantity>, unit: QuantityUnit) -> Self {
        self.quantity = quantity.into();
        self.quantity_unit = unit.as_str().to_string();
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn has_product_name(&self) -> bool {
        !self.product_name.trim().is_empty()
    }
}

/// A stored inventory row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: i64,
    pub product_name: String,
    pub quantity: Quantity,
    pub quantity_unit: Option<String>,
    pub unit: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
