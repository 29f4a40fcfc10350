use larder_core::{InventoryItem, Quantity, QuantityUnit, ToolError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("No receipt text provided.")]
    EmptyInput,
}

impl From<ParseError> for ToolError {
    fn from(e: ParseError) -> Self {
        ToolError::Input(e.to_string())
    }
}

/// A quantity signal found by the weight or volume extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedQuantity {
    pub quantity: Quantity,
    pub quantity_unit: QuantityUnit,
    /// Exact text that matched, removed from the working line by the caller.
    pub matched_text: String,
    /// Packaging label such as `"500ml"` (volume only).
    pub unit_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMatch {
    pub quantity: i64,
    pub matched_text: String,
    /// Remainder after a leading count; replaces the working text outright.
    pub rest: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Totals, tax and payment lines.
    NonProduct,
    /// Nothing left after quantities and pack words were removed.
    EmptyName,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Item(InventoryItem),
    Skipped(SkipReason),
}

/// Items recovered from one receipt, plus the lines that produced none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub items: Vec<InventoryItem>,
    pub skipped: Vec<String>,
}

impl ParseResult {
    pub fn count(&self) -> usize {
        self.items.len()
    }
}
