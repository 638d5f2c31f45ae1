use serde::Serialize;

use crate::models::ItemKind;

/// Which solver attempt produced a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveTier {
    /// Exact calorie match with every macro constraint met.
    Exact,
    /// Calories within the tolerance band, macro constraints met.
    Relaxed,
    /// Least-violation approximation; constraints may be missed.
    BestEffort,
}

impl SolveTier {
    pub const SEQUENCE: [SolveTier; 3] =
        [SolveTier::Exact, SolveTier::Relaxed, SolveTier::BestEffort];

    pub fn label(self) -> &'static str {
        match self {
            SolveTier::Exact => "exact",
            SolveTier::Relaxed => "relaxed",
            SolveTier::BestEffort => "best effort",
        }
    }
}

/// Why an attempt was or was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Accepted,
    Infeasible,
    Unbounded,
    /// The linear solver gave up without a verdict.
    SolverError,
    /// The solver returned a point that failed the feasibility check.
    OutOfTolerance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierAttempt {
    pub tier: SolveTier,
    pub outcome: AttemptOutcome,
}

/// How a treat ended up in the plan when one was required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "method", content = "treat")]
pub enum TreatAdjustment {
    /// Re-solved with a lower bound on this treat.
    Resolved(String),
    /// Swapped in by scaling foods down around this treat.
    Substituted(String),
}

/// Quantity of one item in the plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanEntry {
    pub name: String,
    pub kind: ItemKind,
    /// Ounces per meal.
    pub quantity: f64,
    pub calories: f64,
}

/// Achieved nutrition of a plan, on the configured weighting basis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MacroSummary {
    pub protein_pct: f64,
    pub fat_pct: f64,
    pub corrected_carbs_pct: f64,
    /// Fraction of plan calories coming from treats.
    pub treat_calorie_share: f64,
}

/// Per-meal feeding result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantityPlan {
    /// One entry per input item, in input order.
    pub entries: Vec<PlanEntry>,
    pub target_calories: f64,
    pub achieved_calories: f64,
    pub quality: SolveTier,
    pub macros: MacroSummary,
    pub attempts: Vec<TierAttempt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treat_adjustment: Option<TreatAdjustment>,
}

impl QuantityPlan {
    /// Quantity for an item (case-insensitive), if present.
    pub fn quantity_of(&self, name: &str) -> Option<f64> {
        let key = name.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.name.to_lowercase() == key)
            .map(|e| e.quantity)
    }

    pub fn total_quantity(&self) -> f64 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    pub fn treat_calories(&self) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.kind.is_treat())
            .map(|e| e.calories)
            .sum()
    }

    /// True when some treat has a nonzero quantity.
    pub fn includes_treat(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.kind.is_treat() && e.quantity > 0.0)
    }

    /// Entries with nonzero quantity.
    pub fn fed_entries(&self) -> impl Iterator<Item = &PlanEntry> {
        self.entries.iter().filter(|e| e.quantity > 0.0)
    }

    pub fn tiers_attempted(&self) -> Vec<SolveTier> {
        self.attempts.iter().map(|a| a.tier).collect()
    }
}
