//! Exact and relaxed tiers as linear programs, solved with `good_lp`.
//!
//! One continuous variable per item, bounded by its [`Bound`]. Each ratio
//! constraint is already homogeneous (`a · x <= 0`), so only the calorie
//! rule carries a right-hand side.

use good_lp::{
    constraint, microlp, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};

use crate::planner::constraints::{Bound, CalorieRule, OptimizationProblem};

fn weighted_sum(coefficients: &[f64], vars: &[Variable]) -> Expression {
    coefficients.iter().zip(vars).map(|(&a, &x)| a * x).sum()
}

fn add_variable(vars: &mut ProblemVariables, bound: &Bound) -> Variable {
    let definition = variable().min(bound.lower);
    match bound.upper {
        Some(upper) => vars.add(definition.max(upper)),
        None => vars.add(definition),
    }
}

/// Minimize total ounces under `rule`; quantities come back in item order.
pub fn solve_linear(
    problem: &OptimizationProblem,
    rule: CalorieRule,
) -> Result<Vec<f64>, ResolutionError> {
    let mut vars = ProblemVariables::new();
    let x: Vec<Variable> = problem
        .bounds
        .iter()
        .map(|bound| add_variable(&mut vars, bound))
        .collect();

    let objective = weighted_sum(&problem.objective, &x);
    let mut model = vars.minimise(objective).using(microlp);

    for row in &problem.inequality_rows {
        let activity = weighted_sum(&row.coefficients, &x);
        model = model.with(constraint!(activity <= 0.0));
    }

    let target = problem.target_calories;
    match rule {
        CalorieRule::Exact => {
            let calories = weighted_sum(&problem.calorie_row, &x);
            model = model.with(constraint!(calories == target));
        }
        CalorieRule::Band(band) => {
            let low = weighted_sum(&problem.calorie_row, &x);
            let high = low.clone();
            model = model
                .with(constraint!(low >= target * (1.0 - band)))
                .with(constraint!(high <= target * (1.0 + band)));
        }
    }

    let solution = model.solve()?;
    Ok(x.iter().map(|&v| solution.value(v)).collect())
}
