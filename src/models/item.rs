use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// Whether an item is a staple food or a treat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Food,
    Treat,
}

impl ItemKind {
    pub fn is_treat(self) -> bool {
        self == ItemKind::Treat
    }
}

impl FromStr for ItemKind {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "food" => Ok(ItemKind::Food),
            "treat" | "treats" => Ok(ItemKind::Treat),
            other => Err(FeedError::InvalidInput(format!(
                "unknown item type '{}', expected 'food' or 'treat'",
                other
            ))),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Food => f.write_str("food"),
            ItemKind::Treat => f.write_str("treat"),
        }
    }
}

/// Where an item's carbohydrate figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarbSource {
    /// Printed on the label; taken as authoritative.
    Labeled,
    /// Derived by difference from the other label fields.
    Computed,
}

/// A label record exactly as printed: as-fed percentages, any weight unit.
#[derive(Debug, Clone, PartialEq)]
pub struct RawItem {
    pub name: String,
    pub kind: ItemKind,
    /// Calories in the whole package (or serving) described by `weight`.
    pub calories: f64,
    pub weight: f64,
    pub weight_unit: String,
    pub protein: f64,
    pub fiber: f64,
    pub fat: f64,
    pub moisture: f64,
    pub ash: f64,
    /// Direct carbohydrate percentage, when the label states one.
    pub carbs: Option<f64>,
}

/// An item on dry-matter basis with calories per ounce.
///
/// Only produced by [`crate::planner::normalize_item`] or the checked
/// [`NormalizedItem::from_dry_matter`] constructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedItem {
    name: String,
    kind: ItemKind,
    calories_per_unit: f64,
    protein_pct: f64,
    fat_pct: f64,
    carbs_pct: f64,
    carb_source: CarbSource,
}

impl NormalizedItem {
    /// Build an item from values already on dry-matter basis.
    pub fn from_dry_matter(
        name: impl Into<String>,
        kind: ItemKind,
        calories_per_unit: f64,
        protein_pct: f64,
        fat_pct: f64,
        carbs_pct: f64,
        carb_source: CarbSource,
    ) -> Result<Self, FeedError> {
        let name = name.into();
        if !(calories_per_unit.is_finite() && calories_per_unit > 0.0) {
            return Err(FeedError::invalid_data(
                &name,
                format!("calories per ounce must be positive, got {}", calories_per_unit),
            ));
        }
        for (label, value) in [("protein", protein_pct), ("fat", fat_pct), ("carbs", carbs_pct)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(FeedError::invalid_data(
                    &name,
                    format!("dry-matter {} must be within 0-100%, got {:.2}", label, value),
                ));
            }
        }

        Ok(Self {
            name,
            kind,
            calories_per_unit,
            protein_pct,
            fat_pct,
            carbs_pct,
            carb_source,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn is_treat(&self) -> bool {
        self.kind.is_treat()
    }

    /// Calories per ounce.
    pub fn calories_per_unit(&self) -> f64 {
        self.calories_per_unit
    }

    pub fn protein_pct(&self) -> f64 {
        self.protein_pct
    }

    pub fn fat_pct(&self) -> f64 {
        self.fat_pct
    }

    /// Honest dry-matter carbs, without any overestimation correction.
    pub fn carbs_pct(&self) -> f64 {
        self.carbs_pct
    }

    pub fn carb_source(&self) -> CarbSource {
        self.carb_source
    }

    /// Carbs as compared against the carb ceiling.
    ///
    /// Computed carbs are reduced by `overestimation_factor`; labeled carbs are not.
    pub fn corrected_carbs_pct(&self, overestimation_factor: f64) -> f64 {
        match self.carb_source {
            CarbSource::Labeled => self.carbs_pct,
            CarbSource::Computed => self.carbs_pct * (1.0 - overestimation_factor),
        }
    }

    /// Canonical key for lookups (lowercase name).
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}
