use tracing::{info, warn};

use crate::error::Result;
use crate::models::{NormalizedItem, QuantityPlan, SolveTier, TierAttempt, TreatAdjustment};
use crate::planner::config::PlannerConfig;
use crate::planner::constraints::{Bound, ConstraintBuilder};
use crate::planner::orchestrator::{assemble_plan, run_tiers, TierRun};

/// Tiers a forced-treat re-solve may use. The best-effort tier is left out so
/// that a failed re-solve falls back to substitution instead.
const RESOLVE_TIERS: [SolveTier; 2] = [SolveTier::Exact, SolveTier::Relaxed];

/// Treat indices, densest first.
fn treats_by_density(items: &[NormalizedItem]) -> Vec<usize> {
    let mut treats: Vec<usize> = (0..items.len()).filter(|&i| items[i].is_treat()).collect();
    treats.sort_by(|&a, &b| {
        items[b]
            .calories_per_unit()
            .partial_cmp(&items[a].calories_per_unit())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    treats
}

/// Tier first, then smaller total quantity.
fn is_better(candidate: &QuantityPlan, current: &QuantityPlan) -> bool {
    let rank = |tier: SolveTier| SolveTier::SEQUENCE.iter().position(|&t| t == tier);
    match rank(candidate.quality).cmp(&rank(current.quality)) {
        std::cmp::Ordering::Less => true,
        std::cmp::Ordering::Greater => false,
        std::cmp::Ordering::Equal => candidate.total_quantity() < current.total_quantity(),
    }
}

/// Make sure the plan feeds at least one treat when `require_treat` is set.
///
/// Plans that already include a treat, or runs that don't ask for one, come
/// back untouched. Otherwise each treat is tried with a lower bound of
/// `min_treat_quantity`, capped at what the treat allowance permits. If no
/// such re-solve is feasible, the densest treat is substituted at the full
/// treat allowance and foods are scaled down around it.
pub fn ensure_treat(
    plan: QuantityPlan,
    items: &[NormalizedItem],
    config: &PlannerConfig,
    require_treat: bool,
) -> Result<QuantityPlan> {
    if !require_treat || plan.includes_treat() {
        return Ok(plan);
    }

    let treats = treats_by_density(items);
    if treats.is_empty() {
        warn!("a treat was requested but no treat items were selected");
        return Ok(plan);
    }
    if config.treat_calorie_cap <= 0.0 {
        warn!("a treat was requested but the treat calorie cap is zero");
        return Ok(plan);
    }
    if items.iter().all(NormalizedItem::is_treat) {
        warn!("a treat was requested but no food was selected to go with it");
        return Ok(plan);
    }

    let target = plan.target_calories;
    let mut attempts = plan.attempts.clone();
    let mut best: Option<(QuantityPlan, usize)> = None;

    for &index in &treats {
        // Never demand more of a treat than the cap leaves room for.
        let allowance = config.treat_calorie_cap * target / items[index].calories_per_unit();
        let builder = ConstraintBuilder::new(items, target, config)
            .with_bound(index, Bound::at_least(config.min_treat_quantity.min(allowance)));
        let candidate = match run_tiers(&builder, &RESOLVE_TIERS)? {
            TierRun::Accepted(candidate) => candidate,
            TierRun::Exhausted(failed) => {
                attempts.extend(failed);
                continue;
            }
        };
        if best.as_ref().is_none_or(|(current, _)| is_better(&candidate, current)) {
            best = Some((candidate, index));
        }
    }

    if let Some((mut resolved, index)) = best {
        let name = items[index].name();
        info!(treat = name, "treat included by constrained re-solve");
        attempts.extend(resolved.attempts);
        resolved.attempts = attempts;
        resolved.treat_adjustment = Some(TreatAdjustment::Resolved(name.to_string()));
        return Ok(resolved);
    }

    Ok(substitute_treat(&plan, items, treats[0], attempts, config))
}

/// Give treat `index` the full treat allowance and scale foods to keep calories on target.
fn substitute_treat(
    plan: &QuantityPlan,
    items: &[NormalizedItem],
    index: usize,
    attempts: Vec<TierAttempt>,
    config: &PlannerConfig,
) -> QuantityPlan {
    let target = plan.target_calories;
    let treat = &items[index];
    let treat_calories = config.treat_calorie_cap * target;

    let food_calories: f64 = plan
        .entries
        .iter()
        .filter(|e| !e.kind.is_treat())
        .map(|e| e.calories)
        .sum();
    let food_scale = if food_calories > 0.0 {
        (target - treat_calories) / food_calories
    } else {
        0.0
    };

    let quantities: Vec<f64> = plan
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            if i == index {
                treat_calories / treat.calories_per_unit()
            } else if entry.kind.is_treat() {
                0.0
            } else {
                entry.quantity * food_scale
            }
        })
        .collect();

    warn!(
        treat = treat.name(),
        "no feasible plan forces a treat; substituting at the treat allowance"
    );

    let mut substituted = assemble_plan(
        items,
        &quantities,
        target,
        SolveTier::BestEffort,
        attempts,
        config,
    );
    substituted.treat_adjustment = Some(TreatAdjustment::Substituted(treat.name().to_string()));
    substituted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CarbSource, ItemKind};
    use crate::planner::orchestrator::plan_quantities;

    fn item(name: &str, kind: ItemKind, cal: f64, p: f64, f: f64, c: f64) -> NormalizedItem {
        NormalizedItem::from_dry_matter(name, kind, cal, p, f, c, CarbSource::Labeled).unwrap()
    }

    #[test]
    fn test_unchanged_without_preference() {
        let config = PlannerConfig::default();
        let items = vec![
            item("food", ItemKind::Food, 40.0, 60.0, 50.0, 1.0),
            item("treat", ItemKind::Treat, 120.0, 60.0, 50.0, 1.0),
        ];
        let plan = plan_quantities(&items, 50.0, &config).unwrap();
        let same = ensure_treat(plan.clone(), &items, &config, false).unwrap();
        assert_eq!(plan, same);
    }

    #[test]
    fn test_resolve_forces_treat() {
        let config = PlannerConfig::default();
        let items = vec![
            item("food", ItemKind::Food, 40.0, 60.0, 50.0, 1.0),
            item("treat", ItemKind::Treat, 20.0, 60.0, 50.0, 1.0),
        ];
        let plan = plan_quantities(&items, 50.0, &config).unwrap();
        assert!(!plan.includes_treat());
        let with_treat = ensure_treat(plan, &items, &config, true).unwrap();

        assert!(with_treat.includes_treat());
        assert_eq!(with_treat.quality, SolveTier::Exact);
        assert_eq!(
            with_treat.treat_adjustment,
            Some(TreatAdjustment::Resolved("treat".to_string()))
        );
        assert!(with_treat.quantity_of("treat").unwrap() >= config.min_treat_quantity - 1e-9);
        assert!(with_treat.treat_calories() <= 0.1 * with_treat.achieved_calories + 1e-6);
    }

    #[test]
    fn test_substitution_when_treat_breaks_macros() {
        let config = PlannerConfig::default();
        let items = vec![
            item("food", ItemKind::Food, 40.0, 56.0, 46.0, 1.0),
            item("biscuit", ItemKind::Treat, 30.0, 20.0, 10.0, 60.0),
        ];
        let plan = plan_quantities(&items, 50.0, &config).unwrap();
        assert!(!plan.includes_treat());

        let with_treat = ensure_treat(plan, &items, &config, true).unwrap();
        assert_eq!(with_treat.quality, SolveTier::BestEffort);
        assert_eq!(
            with_treat.treat_adjustment,
            Some(TreatAdjustment::Substituted("biscuit".to_string()))
        );
        assert!((with_treat.quantity_of("biscuit").unwrap() - 5.0 / 30.0).abs() < 1e-9);
        assert!((with_treat.quantity_of("food").unwrap() - 1.125).abs() < 1e-6);
        assert!((with_treat.achieved_calories - 50.0).abs() < 1e-6);
        assert!((with_treat.macros.treat_calorie_share - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_treats_only_left_alone() {
        let config = PlannerConfig::default();
        let items = vec![item("treat", ItemKind::Treat, 90.0, 70.0, 50.0, 1.0)];
        let plan = plan_quantities(&items, 50.0, &config).unwrap();
        let same = ensure_treat(plan.clone(), &items, &config, true).unwrap();
        assert_eq!(plan, same);
        assert!(same.treat_adjustment.is_none());
    }
}
