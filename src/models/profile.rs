use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FeedError;
use crate::planner::constants::{
    ACTIVITY_FACTOR_HIGH, ACTIVITY_FACTOR_LOW, ACTIVITY_FACTOR_MEDIUM,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    Medium,
    High,
}

impl ActivityLevel {
    /// Multiplier applied to resting energy.
    pub fn factor(self) -> f64 {
        match self {
            ActivityLevel::Low => ACTIVITY_FACTOR_LOW,
            ActivityLevel::Medium => ACTIVITY_FACTOR_MEDIUM,
            ActivityLevel::High => ACTIVITY_FACTOR_HIGH,
        }
    }
}

impl TryFrom<i64> for ActivityLevel {
    type Error = FeedError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(ActivityLevel::Low),
            2 => Ok(ActivityLevel::Medium),
            3 => Ok(ActivityLevel::High),
            other => Err(FeedError::InvalidConfig(format!(
                "activity level must be 1, 2, or 3, got {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityLevel::Low => f.write_str("low"),
            ActivityLevel::Medium => f.write_str("medium"),
            ActivityLevel::High => f.write_str("high"),
        }
    }
}

/// Biometric snapshot of one cat for a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatProfile {
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub neutered: bool,
    pub meal_count: u32,
}

impl CatProfile {
    pub fn new(
        weight_kg: f64,
        activity_level: ActivityLevel,
        neutered: bool,
        meal_count: u32,
    ) -> Result<Self, FeedError> {
        let profile = Self {
            weight_kg,
            activity_level,
            neutered,
            meal_count,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), FeedError> {
        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            return Err(FeedError::InvalidConfig(format!(
                "weight must be positive, got {} kg",
                self.weight_kg
            )));
        }
        if self.meal_count == 0 {
            return Err(FeedError::InvalidConfig(
                "meal count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
