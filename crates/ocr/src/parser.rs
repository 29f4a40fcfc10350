use larder_core::{InventoryItem, Quantity, QuantityUnit};

use crate::extract::{
    extract_count, extract_volume, extract_weight, is_non_product_line, normalize_product_name,
    strip_pack_unit, title_case,
};
use crate::types::{LineOutcome, ParseError, ParseResult, SkipReason};

/// Every character that ends a line, including lone `\r` and the Unicode
/// line and paragraph separators OCR engines emit.
const LINE_BREAKS: &[char] = &[
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Turns OCR receipt text into inventory items, one line at a time.
pub struct ReceiptParser;

impl ReceiptParser {
    /// Parse newline-separated OCR output. Blank lines are dropped; every other
    /// line ends up in exactly one of `items` or `skipped`, in input order.
    pub fn parse(text: &str) -> Result<ParseResult, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let mut result = ParseResult::default();
        for raw_line in text.split(LINE_BREAKS) {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            match Self::parse_line(line) {
                LineOutcome::Item(item) => result.items.push(item),
                LineOutcome::Skipped(reason) => {
                    tracing::debug!("Skipping receipt line {line:?} ({reason:?})");
                    result.skipped.push(line.to_string());
                }
            }
        }

        tracing::info!(
            "Parsed {} receipt items (skipped {})",
            result.items.len(),
            result.skipped.len()
        );
        Ok(result)
    }

    /// Decide a single trimmed line.
    pub fn parse_line(line: &str) -> LineOutcome {
        if is_non_product_line(line) {
            return LineOutcome::Skipped(SkipReason::NonProduct);
        }

        let mut working = line.to_string();
        let mut quantity = Quantity::one();
        let mut quantity_unit = QuantityUnit::Unit;
        let mut unit: Option<String> = None;

        if let Some(weight) = extract_weight(&working) {
            quantity = weight.quantity;
            quantity_unit = weight.quantity_unit;
            working = working.replace(&weight.matched_text, " ");
        } else if let Some(volume) = extract_volume(&working) {
            quantity = volume.quantity;
            quantity_unit = volume.quantity_unit;
            unit = volume.unit_label;
            working = working.replace(&volume.matched_text, " ");
        }

        // Weight owns the quantity slot; volume lines may still carry a count.
        if quantity_unit == QuantityUnit::Unit {
            if let Some(count) = extract_count(&working) {
                quantity = Quantity::Whole(count.quantity);
                working = match count.rest {
                    Some(rest) => rest,
                    None => working.replace(&count.matched_text, " "),
                };
            }
        }

        if unit.is_none() {
            if let Some((word, rest)) = strip_pack_unit(&working) {
                unit = Some(word.to_string());
                working = rest;
            }
        }

        let product_name = normalize_product_name(&working);
        if product_name.is_empty() {
            return LineOutcome::Skipped(SkipReason::EmptyName);
        }

        LineOutcome::Item(InventoryItem {
            product_name: title_case(&product_name),
            quantity,
            quantity_unit: quantity_unit.as_str().to_string(),
            unit,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
