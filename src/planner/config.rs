use serde::{Deserialize, Serialize};

use crate::error::{FeedError, Result};
use crate::planner::constants::*;

/// How an item's macro percentages are weighted when averaging over a meal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroBasis {
    /// Weight each item by the calories it contributes.
    #[default]
    Calories,
    /// Weight each item by its quantity in ounces.
    Weight,
}

/// Limits for the best-effort (nonlinear) tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestEffortConfig {
    pub max_iterations: usize,
    /// Random starting points tried in addition to the equal-calorie start.
    pub restarts: usize,
    pub seed: u64,
}

impl Default for BestEffortConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_BEST_EFFORT_ITERATIONS,
            restarts: DEFAULT_BEST_EFFORT_RESTARTS,
            seed: DEFAULT_BEST_EFFORT_SEED,
        }
    }
}

/// Every tunable knob the planner reads. Threaded explicitly through the
/// constraint builder, the orchestrator and the treat injector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub protein_min_pct: f64,
    pub fat_min_pct: f64,
    pub carbs_max_pct: f64,
    /// Fraction of meal calories treats may contribute.
    pub treat_calorie_cap: f64,
    pub carb_overestimation_factor: f64,
    /// Relative tolerance used when checking a solution against its constraints.
    pub feasibility_tolerance: f64,
    /// Relaxed tier accepts calories within `target * (1 ± calorie_band)`.
    pub calorie_band: f64,
    /// Ounces a forced treat must reach.
    pub min_treat_quantity: f64,
    pub macro_basis: MacroBasis,
    pub best_effort: BestEffortConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            protein_min_pct: DEFAULT_PROTEIN_MIN_PCT,
            fat_min_pct: DEFAULT_FAT_MIN_PCT,
            carbs_max_pct: DEFAULT_CARBS_MAX_PCT,
            treat_calorie_cap: DEFAULT_TREAT_CALORIE_CAP,
            carb_overestimation_factor: DEFAULT_CARB_OVERESTIMATION_FACTOR,
            feasibility_tolerance: DEFAULT_FEASIBILITY_TOLERANCE,
            calorie_band: DEFAULT_CALORIE_BAND,
            min_treat_quantity: DEFAULT_MIN_TREAT_QUANTITY,
            macro_basis: MacroBasis::default(),
            best_effort: BestEffortConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Reject knob values the solver cannot work with.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("protein_min_pct", self.protein_min_pct),
            ("fat_min_pct", self.fat_min_pct),
            ("carbs_max_pct", self.carbs_max_pct),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(FeedError::InvalidConfig(format!(
                    "{} must be within 0-100, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.treat_calorie_cap) {
            return Err(FeedError::InvalidConfig(format!(
                "treat_calorie_cap must be within 0-1, got {}",
                self.treat_calorie_cap
            )));
        }
        if !(0.0..1.0).contains(&self.carb_overestimation_factor) {
            return Err(FeedError::InvalidConfig(format!(
                "carb_overestimation_factor must be within [0, 1), got {}",
                self.carb_overestimation_factor
            )));
        }
        if !(self.feasibility_tolerance > 0.0) {
            return Err(FeedError::InvalidConfig(format!(
                "feasibility_tolerance must be positive, got {}",
                self.feasibility_tolerance
            )));
        }
        if !(0.0..1.0).contains(&self.calorie_band) {
            return Err(FeedError::InvalidConfig(format!(
                "calorie_band must be within [0, 1), got {}",
                self.calorie_band
            )));
        }
        if !(self.min_treat_quantity > 0.0) {
            return Err(FeedError::InvalidConfig(format!(
                "min_treat_quantity must be positive, got {}",
                self.min_treat_quantity
            )));
        }
        if self.best_effort.max_iterations == 0 {
            return Err(FeedError::InvalidConfig(
                "best_effort.max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Format the nutrition targets as a compact string for display.
    pub fn display_targets(&self) -> String {
        format!(
            "protein >= {:.1}%, fat >= {:.1}%, carbs <= {:.1}%, treats <= {:.0}% of calories",
            self.protein_min_pct,
            self.fat_min_pct,
            self.carbs_max_pct,
            self.treat_calorie_cap * 100.0
        )
    }
}
