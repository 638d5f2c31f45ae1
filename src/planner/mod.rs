pub mod best_effort;
pub mod config;
pub mod constants;
pub mod constraints;
pub mod linear;
pub mod normalize;
pub mod orchestrator;
pub mod requirements;
pub mod treats;

pub use config::{BestEffortConfig, MacroBasis, PlannerConfig};
pub use constants::*;
pub use constraints::{Bound, CalorieRule, ConstraintBuilder, OptimizationProblem};
pub use normalize::{normalize_all, normalize_item};
pub use orchestrator::{plan_quantities, run_tiers, TierRun};
pub use requirements::{calories_per_meal, daily_calories};
pub use treats::ensure_treat;

use crate::error::Result;
use crate::models::{NormalizedItem, QuantityPlan};

/// Tiered solve for one meal, then the treat preference.
///
/// `target_calories` is usually [`calories_per_meal`] of the cat's profile.
pub fn plan_meal(
    items: &[NormalizedItem],
    target_calories: f64,
    config: &PlannerConfig,
    require_treat: bool,
) -> Result<QuantityPlan> {
    let plan = plan_quantities(items, target_calories, config)?;
    ensure_treat(plan, items, config, require_treat)
}
