use assert_float_eq::*;

use cat_feed_calc_rs::error::FeedError;
use cat_feed_calc_rs::models::{
    AttemptOutcome, CarbSource, ItemKind, NormalizedItem, QuantityPlan, SolveTier,
};
use cat_feed_calc_rs::planner::{
    plan_quantities, run_tiers, Bound, ConstraintBuilder, MacroBasis, PlannerConfig, TierRun,
};

fn item(name: &str, kind: ItemKind, cal: f64, p: f64, f: f64, c: f64) -> NormalizedItem {
    NormalizedItem::from_dry_matter(name, kind, cal, p, f, c, CarbSource::Labeled).unwrap()
}

fn assert_invariants(plan: &QuantityPlan, cap: f64) {
    for entry in &plan.entries {
        assert!(entry.quantity >= 0.0, "{} has negative quantity", entry.name);
    }
    assert!(
        plan.treat_calories() <= cap * plan.achieved_calories + 1e-6,
        "treats supply {} of {} calories",
        plan.treat_calories(),
        plan.achieved_calories
    );
}

fn feasible_mix() -> Vec<NormalizedItem> {
    vec![
        item("Salmon Pate", ItemKind::Food, 28.0, 59.0, 45.5, 0.0),
        item("Chicken Stew", ItemKind::Food, 24.0, 52.0, 48.0, 1.0),
        item("Tuna Bites", ItemKind::Treat, 120.0, 40.0, 20.0, 30.0),
    ]
}

fn unreachable_mix() -> Vec<NormalizedItem> {
    vec![
        item("Dry Kibble", ItemKind::Food, 110.0, 35.0, 16.0, 35.0),
        item("Gravy Chunks", ItemKind::Food, 22.0, 45.0, 25.0, 12.0),
        item("Crunchy Treat", ItemKind::Treat, 120.0, 30.0, 15.0, 40.0),
    ]
}

#[test]
fn test_exact_tier_never_falls_through() {
    let config = PlannerConfig::default();
    let plan = plan_quantities(&feasible_mix(), 56.4, &config).unwrap();

    assert_eq!(plan.quality, SolveTier::Exact);
    assert_eq!(plan.tiers_attempted(), vec![SolveTier::Exact]);
    assert_float_absolute_eq!(plan.achieved_calories, 56.4, 1e-6);
    assert!(plan.macros.protein_pct >= 55.0 - 1e-4);
    assert!(plan.macros.fat_pct >= 45.0 - 1e-4);
    assert!(plan.macros.corrected_carbs_pct <= 2.0 + 1e-4);
    assert_invariants(&plan, config.treat_calorie_cap);
}

#[test]
fn test_relaxed_tier_follows_exact() {
    let config = PlannerConfig::default();
    let items = vec![item("Pate", ItemKind::Food, 50.0, 60.0, 50.0, 1.0)];
    // 0.995 oz tops out at 49.75 calories: short of 50 but inside the 1% band.
    let builder =
        ConstraintBuilder::new(&items, 50.0, &config).with_bound(0, Bound::between(0.0, 0.995));

    let TierRun::Accepted(plan) = run_tiers(&builder, &SolveTier::SEQUENCE).unwrap() else {
        panic!("expected a plan");
    };
    assert_eq!(plan.quality, SolveTier::Relaxed);
    assert_eq!(plan.tiers_attempted(), vec![SolveTier::Exact, SolveTier::Relaxed]);
    assert_eq!(plan.attempts[0].outcome, AttemptOutcome::Infeasible);
    assert!(plan.achieved_calories >= 49.5 - 1e-6);
    assert!(plan.achieved_calories <= 49.75 + 1e-6);
}

#[test]
fn test_best_effort_always_returns_a_plan() {
    let config = PlannerConfig::default();
    let plan = plan_quantities(&unreachable_mix(), 56.4, &config).unwrap();

    assert_eq!(plan.quality, SolveTier::BestEffort);
    assert_eq!(plan.tiers_attempted(), SolveTier::SEQUENCE.to_vec());
    assert_float_absolute_eq!(plan.achieved_calories, 56.4, 1e-6);
    assert_invariants(&plan, config.treat_calorie_cap);
}

#[test]
fn test_treat_cap_respected_with_custom_cap() {
    let mut config = PlannerConfig::default();
    config.treat_calorie_cap = 0.05;

    for items in [feasible_mix(), unreachable_mix()] {
        let plan = plan_quantities(&items, 80.0, &config).unwrap();
        assert_invariants(&plan, 0.05);
    }
}

#[test]
fn test_weight_basis_also_plans() {
    let mut config = PlannerConfig::default();
    config.macro_basis = MacroBasis::Weight;

    let plan = plan_quantities(&feasible_mix(), 56.4, &config).unwrap();
    assert_eq!(plan.quality, SolveTier::Exact);
    assert_float_absolute_eq!(plan.achieved_calories, 56.4, 1e-6);
    assert_invariants(&plan, config.treat_calorie_cap);
}

#[test]
fn test_empty_input_fails_before_solving() {
    let config = PlannerConfig::default();
    let builder = ConstraintBuilder::new(&[], 56.4, &config);

    assert!(matches!(builder.build(), Err(FeedError::EmptyItemSet)));
    assert!(matches!(
        run_tiers(&builder, &SolveTier::SEQUENCE),
        Err(FeedError::EmptyItemSet)
    ));
    assert!(matches!(
        plan_quantities(&[], 56.4, &config),
        Err(FeedError::EmptyItemSet)
    ));
}

#[test]
fn test_non_positive_target_rejected() {
    let config = PlannerConfig::default();
    assert!(matches!(
        plan_quantities(&feasible_mix(), 0.0, &config),
        Err(FeedError::InvalidConfig(_))
    ));
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = PlannerConfig::default();
    config.protein_min_pct = 120.0;
    assert!(matches!(
        plan_quantities(&feasible_mix(), 56.4, &config),
        Err(FeedError::InvalidConfig(_))
    ));
}
