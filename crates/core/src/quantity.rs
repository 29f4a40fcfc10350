use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric quantity as it appears on the wire: integral amounts stay integers,
/// anything with a fractional part is carried as a float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Whole(i64),
    Fractional(f64),
}

impl Quantity {
    pub fn from_decimal(value: Decimal) -> Self {
        let normalized = value.normalize();
        if normalized.fract().is_zero() {
            if let Some(whole) = normalized.to_i64() {
                return Quantity::Whole(whole);
            }
        }
        Quantity::Fractional(normalized.to_f64().unwrap_or(f64::NAN))
    }

    /// SQLite stores quantities as REAL; integral values read back as `Whole`.
    pub fn from_f64(value: f64) -> Self {
        match Decimal::from_f64(value) {
            Some(d) if d.fract().is_zero() => Quantity::from_decimal(d),
            _ => Quantity::Fractional(value),
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Quantity::Whole(n) => n as f64,
            Quantity::Fractional(x) => x,
        }
    }

    pub fn one() -> Self {
        Quantity::Whole(1)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::one()
    }
}

impl From<i64> for Quantity {
    fn from(n: i64) -> Self {
        Quantity::Whole(n)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Whole(n) => write!(f, "{n}"),
            Quantity::Fractional(x) => write!(f, "{x}"),
        }
    }
}

/// Unit of the quantity slot produced by the receipt extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QuantityUnit {
    #[serde(rename = "g")]
    Grams,
    #[default]
    #[serde(rename = "unit")]
    Unit,
}

impl QuantityUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            QuantityUnit::Grams => "g",
            QuantityUnit::Unit => "unit",
        }
    }
}

impl fmt::Display for QuantityUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuantityUnit {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "g" => Ok(QuantityUnit::Grams),
            "unit" => Ok(QuantityUnit::Unit),
            other => Err(format!("Unknown quantity unit: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn integral_decimal_becomes_whole() {
        let q = Quantity::from_decimal(Decimal::from_str("1.2").unwrap() * Decimal::from(1000));
        assert_eq!(q, Quantity::Whole(1200));
    }

    #[test]
    fn fractional_decimal_stays_float() {
        let q = Quantity::from_decimal(Decimal::from_str("0.5").unwrap());
        assert_eq!(q, Quantity::Fractional(0.5));
    }

    #[test]
    fn serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&Quantity::Whole(500)).unwrap(), "500");
        assert_eq!(serde_json::to_string(&Quantity::Fractional(2.5)).unwrap(), "2.5");
    }

    #[test]
    fn deserializes_integers_as_whole() {
        let q: Quantity = serde_json::from_str("3").unwrap();
        assert_eq!(q, Quantity::Whole(3));
        let q: Quantity = serde_json::from_str("0.25").unwrap();
        assert_eq!(q, Quantity::Fractional(0.25));
    }

    #[test]
    fn from_f64_recovers_whole_values() {
        assert_eq!(Quantity::from_f64(500.0), Quantity::Whole(500));
        assert_eq!(Quantity::from_f64(12.5), Quantity::Fractional(12.5));
    }

    #[test]
    fn quantity_unit_roundtrip() {
        assert_eq!(QuantityUnit::from_str("g").unwrap(), QuantityUnit::Grams);
        assert_eq!(QuantityUnit::Unit.to_string(), "unit");
        assert!(QuantityUnit::from_str("lb").is_err());
    }
}
