use crate::error::Result;
use crate::models::CatProfile;
use crate::planner::constants::{NEUTERED_FACTOR, RER_BASE, RER_PER_KG};

/// Resting energy requirement in calories per day.
pub fn resting_energy(weight_kg: f64) -> f64 {
    RER_PER_KG * weight_kg + RER_BASE
}

/// Daily calories for a profile.
pub fn daily_calories(profile: &CatProfile) -> Result<f64> {
    profile.validate()?;
    let neutered = if profile.neutered { NEUTERED_FACTOR } else { 1.0 };
    Ok(resting_energy(profile.weight_kg) * profile.activity_level.factor() * neutered)
}

/// Calories to serve at each meal.
pub fn calories_per_meal(profile: &CatProfile) -> Result<f64> {
    Ok(daily_calories(profile)? / profile.meal_count as f64)
}
