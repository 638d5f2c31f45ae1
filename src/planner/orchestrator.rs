use good_lp::ResolutionError;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{
    AttemptOutcome, NormalizedItem, PlanEntry, QuantityPlan, SolveTier, TierAttempt,
};
use crate::planner::best_effort::minimize_violation;
use crate::planner::config::PlannerConfig;
use crate::planner::constants::QUANTITY_EPSILON;
use crate::planner::constraints::{
    summarize, CalorieRule, ConstraintBuilder, OptimizationProblem,
};
use crate::planner::linear::solve_linear;

/// Run one tier against a freshly built problem.
///
/// Returns the outcome and, when accepted, the quantities.
fn attempt_tier(
    tier: SolveTier,
    problem: &OptimizationProblem,
    config: &PlannerConfig,
) -> (AttemptOutcome, Option<Vec<f64>>) {
    let rule = match tier {
        SolveTier::Exact => CalorieRule::Exact,
        SolveTier::Relaxed => CalorieRule::Band(config.calorie_band),
        SolveTier::BestEffort => {
            return (AttemptOutcome::Accepted, Some(minimize_violation(problem, config)));
        }
    };

    match solve_linear(problem, rule) {
        Ok(values) => {
            let values = clean_quantities(values);
            if problem.is_feasible(&values, rule, config.feasibility_tolerance) {
                (AttemptOutcome::Accepted, Some(values))
            } else {
                (AttemptOutcome::OutOfTolerance, None)
            }
        }
        Err(ResolutionError::Infeasible) => (AttemptOutcome::Infeasible, None),
        Err(ResolutionError::Unbounded) => (AttemptOutcome::Unbounded, None),
        Err(e) => {
            warn!(tier = tier.label(), error = %e, "linear solver failed");
            (AttemptOutcome::SolverError, None)
        }
    }
}

/// Snap round-off below zero and negligible quantities to exactly zero.
fn clean_quantities(values: Vec<f64>) -> Vec<f64> {
    values
        .into_iter()
        .map(|v| if v.is_finite() && v > QUANTITY_EPSILON { v } else { 0.0 })
        .collect()
}

/// Turn raw quantities into a plan annotated with its tier and diagnostics.
pub fn assemble_plan(
    items: &[NormalizedItem],
    quantities: &[f64],
    target_calories: f64,
    quality: SolveTier,
    attempts: Vec<TierAttempt>,
    config: &PlannerConfig,
) -> QuantityPlan {
    let quantities = clean_quantities(quantities.to_vec());
    let entries: Vec<PlanEntry> = items
        .iter()
        .zip(&quantities)
        .map(|(item, &quantity)| PlanEntry {
            name: item.name().to_string(),
            kind: item.kind(),
            quantity,
            calories: quantity * item.calories_per_unit(),
        })
        .collect();

    QuantityPlan {
        achieved_calories: entries.iter().map(|e| e.calories).sum(),
        macros: summarize(items, &quantities, config),
        entries,
        target_calories,
        quality,
        attempts,
        treat_adjustment: None,
    }
}

/// Result of walking a tier sequence.
#[derive(Debug, Clone)]
pub enum TierRun {
    Accepted(QuantityPlan),
    /// Every listed tier was rejected.
    Exhausted(Vec<TierAttempt>),
}

/// Try `tiers` in order, rebuilding the problem for each attempt.
///
/// Builder errors (empty item set, bad target) surface before any solver runs.
pub fn run_tiers(builder: &ConstraintBuilder<'_>, tiers: &[SolveTier]) -> Result<TierRun> {
    let config = builder.config();
    let mut attempts = Vec::with_capacity(tiers.len());

    for &tier in tiers {
        let problem = builder.build()?;
        let (outcome, quantities) = attempt_tier(tier, &problem, config);
        debug!(tier = tier.label(), ?outcome, "solver attempt");
        attempts.push(TierAttempt { tier, outcome });

        if let Some(quantities) = quantities {
            match tier {
                SolveTier::BestEffort => warn!(
                    items = problem.num_variables(),
                    "no feasible linear plan; returning best-effort approximation"
                ),
                _ => info!(tier = tier.label(), "plan accepted"),
            }
            return Ok(TierRun::Accepted(assemble_plan(
                builder.items(),
                &quantities,
                builder.target_calories(),
                tier,
                attempts,
                config,
            )));
        }
    }

    Ok(TierRun::Exhausted(attempts))
}

/// Quantities per meal for `items` at `target_calories`.
///
/// Always yields a plan for a valid, non-empty item set; the plan's
/// `quality` says which tier produced it.
pub fn plan_quantities(
    items: &[NormalizedItem],
    target_calories: f64,
    config: &PlannerConfig,
) -> Result<QuantityPlan> {
    config.validate()?;
    let builder = ConstraintBuilder::new(items, target_calories, config);
    match run_tiers(&builder, &SolveTier::SEQUENCE)? {
        TierRun::Accepted(plan) => Ok(plan),
        // Unreachable in practice: the best-effort tier always accepts.
        TierRun::Exhausted(attempts) => Ok(assemble_plan(
            items,
            &vec![0.0; items.len()],
            target_calories,
            SolveTier::BestEffort,
            attempts,
            config,
        )),
    }
}
