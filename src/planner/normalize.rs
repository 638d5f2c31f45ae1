use crate::error::{FeedError, Result};
use crate::models::{CarbSource, NormalizedItem, RawItem, WeightUnit};

/// Carbs by difference: `100 - (protein + fat + fiber + moisture + ash)`.
///
/// Labels that sum past 100% yield a negative figure, which is floored at 0.
pub fn carbs_by_difference(protein: f64, fat: f64, fiber: f64, moisture: f64, ash: f64) -> f64 {
    (100.0 - (protein + fat + fiber + moisture + ash)).max(0.0)
}

/// Scale an as-fed percentage to dry-matter basis.
///
/// `moisture` must be in `[0, 100)`; zero means the label is already dry matter.
pub fn to_dry_matter(as_fed_pct: f64, moisture: f64) -> f64 {
    if moisture == 0.0 {
        return as_fed_pct;
    }
    as_fed_pct * 100.0 / (100.0 - moisture)
}

fn check_pct(name: &str, field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(FeedError::invalid_data(
            name,
            format!("{} must be within 0-100%, got {}", field, value),
        ));
    }
    Ok(())
}

/// Convert a label record into a dry-matter item with calories per ounce.
pub fn normalize_item(raw: &RawItem) -> Result<NormalizedItem> {
    let name = raw.name.trim();
    if name.is_empty() {
        return Err(FeedError::invalid_data(&raw.name, "name is empty"));
    }

    let unit: WeightUnit = raw.weight_unit.parse()?;

    if !(raw.weight.is_finite() && raw.weight > 0.0) {
        return Err(FeedError::invalid_data(
            name,
            format!("weight must be positive, got {}", raw.weight),
        ));
    }
    if !(raw.calories.is_finite() && raw.calories > 0.0) {
        return Err(FeedError::invalid_data(
            name,
            format!("calories must be positive, got {}", raw.calories),
        ));
    }

    check_pct(name, "protein", raw.protein)?;
    check_pct(name, "fat", raw.fat)?;
    check_pct(name, "fiber", raw.fiber)?;
    check_pct(name, "ash", raw.ash)?;
    if !raw.moisture.is_finite() || !(0.0..100.0).contains(&raw.moisture) {
        return Err(FeedError::invalid_data(
            name,
            format!("moisture must be within [0, 100), got {}", raw.moisture),
        ));
    }

    let (carbs_as_fed, carb_source) = match raw.carbs {
        Some(carbs) => {
            check_pct(name, "carbs", carbs)?;
            (carbs, CarbSource::Labeled)
        }
        None => (
            carbs_by_difference(raw.protein, raw.fat, raw.fiber, raw.moisture, raw.ash),
            CarbSource::Computed,
        ),
    };

    let calories_per_unit = raw.calories / unit.to_ounces(raw.weight);

    NormalizedItem::from_dry_matter(
        name,
        raw.kind,
        calories_per_unit,
        to_dry_matter(raw.protein, raw.moisture),
        to_dry_matter(raw.fat, raw.moisture),
        to_dry_matter(carbs_as_fed, raw.moisture),
        carb_source,
    )
}

/// Normalize every record, keeping per-record results so the caller decides
/// whether one bad label skips the item or aborts the run.
pub fn normalize_all(raws: &[RawItem]) -> Vec<Result<NormalizedItem>> {
    raws.iter().map(normalize_item).collect()
}
