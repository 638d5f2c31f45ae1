use std::fmt;
use std::str::FromStr;

use crate::error::FeedError;
use crate::planner::constants::{GRAMS_PER_OUNCE, OUNCES_PER_POUND};

/// Weight units accepted on labels. The canonical unit is the ounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightUnit {
    Ounce,
    Pound,
    Gram,
    Kilogram,
}

impl WeightUnit {
    pub const ALL: [WeightUnit; 4] = [
        WeightUnit::Ounce,
        WeightUnit::Pound,
        WeightUnit::Gram,
        WeightUnit::Kilogram,
    ];

    /// Spellings recognized for each unit (matched after trimming and lowercasing).
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            WeightUnit::Ounce => &["oz", "ozs", "ounce", "ounces"],
            WeightUnit::Pound => &["lb", "lbs", "pound", "pounds"],
            WeightUnit::Gram => &["g", "gs", "gram", "grams", "gr"],
            WeightUnit::Kilogram => &["kg", "kgs", "kilogram", "kilograms", "kilo", "kilos"],
        }
    }

    /// Ounces in one of this unit.
    pub fn ounces_per_unit(self) -> f64 {
        match self {
            WeightUnit::Ounce => 1.0,
            WeightUnit::Pound => OUNCES_PER_POUND,
            WeightUnit::Gram => 1.0 / GRAMS_PER_OUNCE,
            WeightUnit::Kilogram => 1000.0 / GRAMS_PER_OUNCE,
        }
    }

    pub fn to_ounces(self, value: f64) -> f64 {
        value * self.ounces_per_unit()
    }

    pub fn from_ounces(self, ounces: f64) -> f64 {
        ounces / self.ounces_per_unit()
    }
}

impl FromStr for WeightUnit {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        WeightUnit::ALL
            .into_iter()
            .find(|unit| unit.aliases().contains(&needle.as_str()))
            .ok_or_else(|| FeedError::UnsupportedUnit(s.to_string()))
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.aliases()[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("OZ".parse::<WeightUnit>().unwrap(), WeightUnit::Ounce);
        assert_eq!(" Pounds ".parse::<WeightUnit>().unwrap(), WeightUnit::Pound);
        assert_eq!("Grams".parse::<WeightUnit>().unwrap(), WeightUnit::Gram);
        assert_eq!("KILO".parse::<WeightUnit>().unwrap(), WeightUnit::Kilogram);
    }

    #[test]
    fn test_unknown_unit_rejected() {
        let err = "stone".parse::<WeightUnit>().unwrap_err();
        assert!(matches!(err, FeedError::UnsupportedUnit(u) if u == "stone"));
    }

    #[test]
    fn test_round_trip_every_alias() {
        for unit in WeightUnit::ALL {
            for alias in unit.aliases() {
                let parsed: WeightUnit = alias.parse().unwrap();
                for value in [0.001, 1.0, 3.5, 250.0, 12_000.0] {
                    let back = parsed.from_ounces(parsed.to_ounces(value));
                    assert!((back - value).abs() <= 1e-9 * value.max(1.0));
                }
            }
        }
    }

    #[test]
    fn test_known_conversions() {
        assert!((WeightUnit::Pound.to_ounces(1.0) - 16.0).abs() < 1e-12);
        assert!((WeightUnit::Kilogram.to_ounces(1.0) - 35.274).abs() < 1e-3);
        assert!((WeightUnit::Gram.to_ounces(85.0) - 2.998).abs() < 1e-3);
    }
}
