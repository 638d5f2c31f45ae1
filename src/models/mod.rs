mod item;
mod plan;
mod profile;
mod unit;

pub use item::{CarbSource, ItemKind, NormalizedItem, RawItem};
pub use plan::{
    AttemptOutcome, MacroSummary, PlanEntry, QuantityPlan, SolveTier, TierAttempt, TreatAdjustment,
};
pub use profile::{ActivityLevel, CatProfile};
pub use unit::WeightUnit;
