use std::str::FromStr;
use std::sync::OnceLock;

use larder_core::{Quantity, QuantityUnit};
use regex::Regex;
use rust_decimal::Decimal;

use crate::types::{CountMatch, ExtractedQuantity};

// ── Keyword tables ───────────────────────────────────────────────────────────

/// Lines containing any of these are receipt furniture, not products.
pub const SKIP_KEYWORDS: &[&str] = &[
    "total",
    "subtotal",
    "tax",
    "change",
    "balance",
    "cash",
    "credit",
    "debit",
    "visa",
    "mastercard",
    "amex",
    "payment",
    "card",
];

/// Packaging descriptors, most specific first. List order decides ties.
pub const PACK_WORDS: &[&str] = &[
    "family pack",
    "pack",
    "box",
    "bag",
    "bottle",
    "dozen",
    "loaf",
    "head",
    "tub",
    "can",
    "jar",
];

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// ASCII digits only: matched text must parse as a Decimal / i64.
re!(re_weight, r"(?i)([0-9]+(?:\.[0-9]+)?)\s*(kg|g)\b");
re!(re_volume, r"(?i)([0-9]+(?:\.[0-9]+)?)\s*(l|ml)\b");
re!(re_leading_count, r"^\s*([0-9]+)\s+(.*)$");
re!(re_multiplier_count, r"(?i)\b([0-9]+)\s*(x|ct|pcs|pc|each|ea)\b");

// ── Classifier ───────────────────────────────────────────────────────────────

/// Whether the line is a total, tax, balance or payment artifact.
pub fn is_non_product_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    SKIP_KEYWORDS.iter().any(|word| lower.contains(word))
}

// ── Quantity extractors ──────────────────────────────────────────────────────

/// First `<number> kg|g` in the line, converted to grams.
pub fn extract_weight(line: &str) -> Option<ExtractedQuantity> {
    let c = re_weight().captures(line)?;
    let value = Decimal::from_str(c.get(1)?.as_str()).ok()?;
    let grams = if c.get(2)?.as_str().eq_ignore_ascii_case("kg") {
        value.checked_mul(Decimal::from(1000))?
    } else {
        value
    };
    Some(ExtractedQuantity {
        quantity: Quantity::from_decimal(grams),
        quantity_unit: QuantityUnit::Grams,
        matched_text: c.get(0)?.as_str().to_string(),
        unit_label: None,
    })
}

/// First `<number> l|ml` in the line. Volume describes the package, so the
/// quantity stays at one and the size becomes the unit label.
pub fn extract_volume(line: &str) -> Option<ExtractedQuantity> {
    let c = re_volume().captures(line)?;
    let value = c.get(1)?.as_str();
    let unit = c.get(2)?.as_str().to_lowercase();
    Some(ExtractedQuantity {
        quantity: Quantity::one(),
        quantity_unit: QuantityUnit::Unit,
        matched_text: c.get(0)?.as_str().to_string(),
        unit_label: Some(format!("{value}{unit}")),
    })
}

/// A leading `<N> <rest>` count, else an `<N> x|ct|pcs|pc|each|ea` multiplier.
/// The multiplier rule is never consulted once the leading rule matches.
pub fn extract_count(line: &str) -> Option<CountMatch> {
    if let Some(c) = re_leading_count().captures(line) {
        if let (Some(n), Some(m), Some(rest)) = (c.get(1), c.get(0), c.get(2)) {
            if let Ok(quantity) = n.as_str().parse::<i64>() {
                return Some(CountMatch {
                    quantity,
                    matched_text: m.as_str().to_string(),
                    rest: Some(rest.as_str().to_string()),
                });
            }
        }
    }

    let c = re_multiplier_count().captures(line)?;
    let quantity = c.get(1)?.as_str().parse::<i64>().ok()?;
    Some(CountMatch {
        quantity,
        matched_text: c.get(0)?.as_str().to_string(),
        rest: None,
    })
}

// ── Pack-unit normalizer ─────────────────────────────────────────────────────

/// First pack word (in list order) contained in `line`, ignoring case.
pub fn extract_pack_unit(line: &str) -> Option<&'static str> {
    let lower = line.to_lowercase();
    PACK_WORDS.iter().find(|word| lower.contains(*word)).copied()
}

/// Detect a pack word and cut its first exact (lowercase) occurrence out of
/// the line. Capitalized text is left alone, so "Bagels" keeps its name.
pub fn strip_pack_unit(line: &str) -> Option<(&'static str, String)> {
    let word = extract_pack_unit(line)?;
    Some((word, line.replacen(word, " ", 1)))
}

// ── Name normalization ───────────────────────────────────────────────────────

/// Collapse whitespace runs and trim surrounding spaces and hyphens.
pub fn normalize_product_name(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim_matches(|c| c == ' ' || c == '-').to_string()
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(ch);
            prev_letter = false;
        }
    }
    out
}

// ── Tests ────────────────────────────────────────────────────────────────────
