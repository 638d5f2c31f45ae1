//! Least-violation search used when no linear formulation is feasible.
//!
//! Minimizes the sum of squared shortfalls (percentage points) across the
//! macro rows, the treat cap and the calorie target, plus a small pull toward
//! smaller meals. Projected gradient descent with backtracking runs from the
//! equal-calorie split and a few seeded random starts; the best point is then
//! rescaled to the calorie target and repaired against the treat cap.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::planner::config::PlannerConfig;
use crate::planner::constants::{BEST_EFFORT_QUANTITY_WEIGHT, QUANTITY_EPSILON};
use crate::planner::constraints::OptimizationProblem;

const ARMIJO: f64 = 1e-4;
const MIN_STEP: f64 = 1e-14;
const GRADIENT_FLOOR: f64 = 1e-10;

/// Total squared violation of `x`.
pub fn violation_score(problem: &OptimizationProblem, x: &[f64]) -> f64 {
    let target = problem.target_calories;
    let calorie_gap = (problem.calories(x) - target) / target * 100.0;

    let macro_penalty: f64 = problem
        .inequality_rows
        .iter()
        .map(|row| row.violation(x).powi(2))
        .sum();

    let quantity: f64 = x.iter().sum();

    macro_penalty + calorie_gap * calorie_gap + BEST_EFFORT_QUANTITY_WEIGHT * quantity
}

fn project(problem: &OptimizationProblem, x: &mut [f64]) {
    for (v, bound) in x.iter_mut().zip(&problem.bounds) {
        *v = bound.clamp(*v);
    }
}

fn gradient(problem: &OptimizationProblem, x: &[f64], fx: f64) -> Vec<f64> {
    let mut probe = x.to_vec();
    (0..x.len())
        .map(|j| {
            let h = 1e-7 * x[j].abs().max(1.0);
            probe[j] = x[j] + h;
            let g = (violation_score(problem, &probe) - fx) / h;
            probe[j] = x[j];
            g
        })
        .collect()
}

/// Projected gradient descent from `start`. Returns the final point and its score.
fn descend(
    problem: &OptimizationProblem,
    start: Vec<f64>,
    max_iterations: usize,
) -> (Vec<f64>, f64) {
    let mut x = start;
    project(problem, &mut x);
    let mut fx = violation_score(problem, &x);
    let mut step = 1.0;

    for _ in 0..max_iterations {
        let g = gradient(problem, &x, fx);
        if g.iter().map(|v| v * v).sum::<f64>().sqrt() < GRADIENT_FLOOR {
            break;
        }

        let mut t = step;
        let accepted = loop {
            let mut candidate: Vec<f64> = x.iter().zip(&g).map(|(v, d)| v - t * d).collect();
            project(problem, &mut candidate);

            let decrease: f64 = g
                .iter()
                .zip(x.iter().zip(&candidate))
                .map(|(d, (a, b))| d * (a - b))
                .sum();
            let fc = violation_score(problem, &candidate);
            if decrease > 0.0 && fc <= fx - ARMIJO * decrease {
                break Some((candidate, fc));
            }

            t *= 0.5;
            if t < MIN_STEP {
                break None;
            }
        };

        let Some((candidate, fc)) = accepted else {
            break;
        };
        let improvement = fx - fc;
        x = candidate;
        fx = fc;
        step = t * 2.0;
        if improvement <= 1e-12 * (1.0 + fx) {
            break;
        }
    }

    (x, fx)
}

/// Split the calorie target evenly across the given items.
fn equal_split(problem: &OptimizationProblem, include: impl Fn(usize) -> bool) -> Vec<f64> {
    let chosen = (0..problem.num_variables()).filter(|&j| include(j)).count();
    if chosen == 0 {
        return vec![0.0; problem.num_variables()];
    }
    let share = problem.target_calories / chosen as f64;
    problem
        .calorie_row
        .iter()
        .enumerate()
        .map(|(j, cal)| if include(j) { share / cal } else { 0.0 })
        .collect()
}

/// Rescale to the calorie target, enforce the treat cap, then clamp to bounds.
fn repair(problem: &OptimizationProblem, mut x: Vec<f64>, treat_cap: f64) -> Vec<f64> {
    let target = problem.target_calories;
    let has_food = problem.treat_mask.iter().any(|&t| !t);

    let calories = problem.calories(&x);
    if calories <= QUANTITY_EPSILON {
        x = equal_split(problem, |j| !has_food || !problem.treat_mask[j]);
    } else {
        let scale = target / calories;
        x.iter_mut().for_each(|v| *v *= scale);
    }

    let (mut treat_cal, mut food_cal) = (0.0, 0.0);
    for ((v, cal), &is_treat) in x.iter().zip(&problem.calorie_row).zip(&problem.treat_mask) {
        if is_treat {
            treat_cal += v * cal;
        } else {
            food_cal += v * cal;
        }
    }

    if treat_cal > treat_cap * (treat_cal + food_cal) {
        if !has_food {
            // Treats alone can never respect the cap.
            x.iter_mut().for_each(|v| *v = 0.0);
        } else {
            if food_cal <= QUANTITY_EPSILON {
                let foods = equal_split(problem, |j| !problem.treat_mask[j]);
                for (v, f) in x.iter_mut().zip(foods) {
                    if f > 0.0 {
                        *v = f;
                    }
                }
                food_cal = target;
            }
            let treat_scale = treat_cap * target / treat_cal;
            let food_scale = (1.0 - treat_cap) * target / food_cal;
            for (v, &is_treat) in x.iter_mut().zip(&problem.treat_mask) {
                *v *= if is_treat { treat_scale } else { food_scale };
            }
        }
    }

    project(problem, &mut x);
    x
}

/// Least-violation quantities. Always returns a point; never fails.
pub fn minimize_violation(problem: &OptimizationProblem, config: &PlannerConfig) -> Vec<f64> {
    let settings = &config.best_effort;
    let mut rng = StdRng::seed_from_u64(settings.seed);

    let mut starts = vec![equal_split(problem, |_| true)];
    for _ in 0..settings.restarts {
        let base = equal_split(problem, |_| true);
        starts.push(base.iter().map(|v| v * rng.gen_range(0.0..2.0)).collect());
    }

    let (best, _) = starts
        .into_iter()
        .map(|start| descend(problem, start, settings.max_iterations))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or_else(|| (vec![0.0; problem.num_variables()], f64::INFINITY));

    repair(problem, best, config.treat_calorie_cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CarbSource, ItemKind, NormalizedItem};
    use crate::planner::constraints::ConstraintBuilder;

    fn item(name: &str, kind: ItemKind, cal: f64, p: f64, f: f64, c: f64) -> NormalizedItem {
        NormalizedItem::from_dry_matter(name, kind, cal, p, f, c, CarbSource::Labeled).unwrap()
    }

    #[test]
    fn test_hits_calorie_target_when_macros_unreachable() {
        let config = PlannerConfig::default();
        // Neither item can reach 55% protein.
        let items = vec![
            item("kibble", ItemKind::Food, 100.0, 35.0, 15.0, 30.0),
            item("pate", ItemKind::Food, 30.0, 45.0, 30.0, 5.0),
        ];
        let problem = ConstraintBuilder::new(&items, 60.0, &config).build().unwrap();
        let x = minimize_violation(&problem, &config);

        assert!(x.iter().all(|&v| v >= 0.0));
        assert!((problem.calories(&x) - 60.0).abs() < 1e-6);
        // Higher-protein pate should dominate the mix.
        assert!(x[1] * 30.0 > x[0] * 100.0);
    }

    #[test]
    fn test_treat_cap_repaired() {
        let config = PlannerConfig::default();
        let items = vec![
            item("food", ItemKind::Food, 30.0, 40.0, 20.0, 10.0),
            item("treat", ItemKind::Treat, 90.0, 70.0, 50.0, 1.0),
        ];
        let problem = ConstraintBuilder::new(&items, 50.0, &config).build().unwrap();
        let x = minimize_violation(&problem, &config);

        let total = problem.calories(&x);
        let treat = x[1] * 90.0;
        assert!((total - 50.0).abs() < 1e-6);
        assert!(treat <= 0.1 * total + 1e-6);
    }

    #[test]
    fn test_treats_only_yields_zero_plan() {
        let config = PlannerConfig::default();
        let items = vec![item("treat", ItemKind::Treat, 90.0, 70.0, 50.0, 1.0)];
        let problem = ConstraintBuilder::new(&items, 50.0, &config).build().unwrap();
        let x = minimize_violation(&problem, &config);
        assert_eq!(x, vec![0.0]);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let config = PlannerConfig::default();
        let items = vec![
            item("kibble", ItemKind::Food, 100.0, 35.0, 15.0, 30.0),
            item("pate", ItemKind::Food, 30.0, 45.0, 30.0, 5.0),
        ];
        let problem = ConstraintBuilder::new(&items, 60.0, &config).build().unwrap();
        assert_eq!(
            minimize_violation(&problem, &config),
            minimize_violation(&problem, &config)
        );
    }

    #[test]
    fn test_score_zero_only_for_perfect_point() {
        let config = PlannerConfig::default();
        let items = vec![item("ideal", ItemKind::Food, 30.0, 60.0, 50.0, 1.0)];
        let problem = ConstraintBuilder::new(&items, 30.0, &config).build().unwrap();
        let score = violation_score(&problem, &[1.0]);
        assert!((score - BEST_EFFORT_QUANTITY_WEIGHT).abs() < 1e-12);
        assert!(violation_score(&problem, &[0.5]) > score);
    }
}
