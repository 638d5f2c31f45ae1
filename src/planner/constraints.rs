use crate::error::{FeedError, Result};
use crate::models::{MacroSummary, NormalizedItem};
use crate::planner::config::{MacroBasis, PlannerConfig};

/// Box bound on one quantity variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub lower: f64,
    pub upper: Option<f64>,
}

impl Bound {
    pub const NON_NEGATIVE: Bound = Bound {
        lower: 0.0,
        upper: None,
    };

    pub fn at_least(lower: f64) -> Self {
        Self { lower, upper: None }
    }

    pub fn between(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper: Some(upper),
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        let value = value.max(self.lower);
        match self.upper {
            Some(upper) => value.min(upper),
            None => value,
        }
    }
}

/// How the calorie target is enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalorieRule {
    /// Calories equal the target.
    Exact,
    /// Calories within `target * (1 ± band)`.
    Band(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    ProteinMin,
    FatMin,
    CarbsMax,
    TreatCap,
}

impl RowKind {
    pub fn label(self) -> &'static str {
        match self {
            RowKind::ProteinMin => "protein minimum",
            RowKind::FatMin => "fat minimum",
            RowKind::CarbsMax => "carbs maximum",
            RowKind::TreatCap => "treat calorie cap",
        }
    }
}

/// A homogeneous row `coefficients · x <= 0`.
///
/// `coefficients · x / weights · x` is the signed violation of the underlying
/// ratio constraint, expressed in percentage points after `scale`.
#[derive(Debug, Clone)]
pub struct InequalityRow {
    pub kind: RowKind,
    pub coefficients: Vec<f64>,
    pub weights: Vec<f64>,
    pub scale: f64,
}

impl InequalityRow {
    pub fn activity(&self, x: &[f64]) -> f64 {
        dot(&self.coefficients, x)
    }

    /// Amount the ratio constraint is exceeded by, in percentage points (0 if met).
    pub fn violation(&self, x: &[f64]) -> f64 {
        let total = dot(&self.weights, x);
        if total <= f64::EPSILON {
            return 0.0;
        }
        (self.activity(x) / total).max(0.0) * self.scale
    }
}

/// One attempt's worth of coefficients. Built fresh for every attempt.
#[derive(Debug, Clone)]
pub struct OptimizationProblem {
    /// Minimize `objective · x` (total ounces).
    pub objective: Vec<f64>,
    /// Calories per ounce of each item.
    pub calorie_row: Vec<f64>,
    pub target_calories: f64,
    pub inequality_rows: Vec<InequalityRow>,
    pub bounds: Vec<Bound>,
    pub treat_mask: Vec<bool>,
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl OptimizationProblem {
    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn calories(&self, x: &[f64]) -> f64 {
        dot(&self.calorie_row, x)
    }

    /// Check a candidate against every constraint within a relative tolerance.
    pub fn is_feasible(&self, x: &[f64], rule: CalorieRule, tolerance: f64) -> bool {
        if x.len() != self.num_variables() || x.iter().any(|v| !v.is_finite()) {
            return false;
        }

        let within_bounds = x.iter().zip(&self.bounds).all(|(&v, b)| {
            let slack = tolerance * b.lower.abs().max(1.0);
            v >= b.lower - slack && b.upper.is_none_or(|u| v <= u + tolerance * u.abs().max(1.0))
        });
        if !within_bounds {
            return false;
        }

        let target = self.target_calories;
        let calories = self.calories(x);
        let calorie_slack = tolerance * target;
        let calories_ok = match rule {
            CalorieRule::Exact => (calories - target).abs() <= calorie_slack,
            CalorieRule::Band(band) => {
                calories >= target * (1.0 - band) - calorie_slack
                    && calories <= target * (1.0 + band) + calorie_slack
            }
        };
        if !calories_ok {
            return false;
        }

        self.inequality_rows.iter().all(|row| {
            let magnitude: f64 = row
                .coefficients
                .iter()
                .zip(x)
                .map(|(a, v)| (a * v).abs())
                .sum();
            row.activity(x) <= tolerance * magnitude.max(1.0)
        })
    }
}

/// Assembles an [`OptimizationProblem`] from normalized items and a calorie target.
#[derive(Debug, Clone)]
pub struct ConstraintBuilder<'a> {
    items: &'a [NormalizedItem],
    target_calories: f64,
    config: &'a PlannerConfig,
    overrides: Vec<(usize, Bound)>,
}

impl<'a> ConstraintBuilder<'a> {
    pub fn new(
        items: &'a [NormalizedItem],
        target_calories: f64,
        config: &'a PlannerConfig,
    ) -> Self {
        Self {
            items,
            target_calories,
            config,
            overrides: Vec::new(),
        }
    }

    /// Replace the default `[0, inf)` bound of one item.
    pub fn with_bound(mut self, index: usize, bound: Bound) -> Self {
        self.overrides.push((index, bound));
        self
    }

    pub fn items(&self) -> &'a [NormalizedItem] {
        self.items
    }

    pub fn target_calories(&self) -> f64 {
        self.target_calories
    }

    pub fn config(&self) -> &'a PlannerConfig {
        self.config
    }

    pub fn build(&self) -> Result<OptimizationProblem> {
        if self.items.is_empty() {
            return Err(FeedError::EmptyItemSet);
        }
        if !(self.target_calories.is_finite() && self.target_calories > 0.0) {
            return Err(FeedError::InvalidConfig(format!(
                "target calories must be positive, got {}",
                self.target_calories
            )));
        }

        let config = self.config;
        let n = self.items.len();
        let calorie_row: Vec<f64> = self.items.iter().map(|i| i.calories_per_unit()).collect();
        let weights: Vec<f64> = self
            .items
            .iter()
            .map(|i| macro_weight(i, config.macro_basis))
            .collect();

        let protein = min_row(
            RowKind::ProteinMin,
            self.items,
            &weights,
            config.protein_min_pct,
            NormalizedItem::protein_pct,
        );
        let fat = min_row(
            RowKind::FatMin,
            self.items,
            &weights,
            config.fat_min_pct,
            NormalizedItem::fat_pct,
        );
        let carbs = InequalityRow {
            kind: RowKind::CarbsMax,
            coefficients: self
                .items
                .iter()
                .zip(&weights)
                .map(|(item, w)| {
                    w * (item.corrected_carbs_pct(config.carb_overestimation_factor)
                        - config.carbs_max_pct)
                })
                .collect(),
            weights: weights.clone(),
            scale: 1.0,
        };
        let treat_cap = InequalityRow {
            kind: RowKind::TreatCap,
            coefficients: self
                .items
                .iter()
                .map(|item| {
                    let share = if item.is_treat() { 1.0 } else { 0.0 };
                    item.calories_per_unit() * (share - config.treat_calorie_cap)
                })
                .collect(),
            weights: calorie_row.clone(),
            scale: 100.0,
        };

        let mut bounds = vec![Bound::NON_NEGATIVE; n];
        for &(index, bound) in &self.overrides {
            let slot = bounds.get_mut(index).ok_or_else(|| {
                FeedError::InvalidConfig(format!("bound override for item #{} out of range", index))
            })?;
            *slot = bound;
        }

        Ok(OptimizationProblem {
            objective: vec![1.0; n],
            calorie_row,
            target_calories: self.target_calories,
            inequality_rows: vec![protein, fat, carbs, treat_cap],
            bounds,
            treat_mask: self.items.iter().map(|i| i.is_treat()).collect(),
        })
    }
}

/// Ratio constraint `avg(v) >= threshold` as `sum w_i (threshold - v_i) x_i <= 0`.
fn min_row(
    kind: RowKind,
    items: &[NormalizedItem],
    weights: &[f64],
    threshold: f64,
    value: impl Fn(&NormalizedItem) -> f64,
) -> InequalityRow {
    InequalityRow {
        kind,
        coefficients: items
            .iter()
            .zip(weights)
            .map(|(item, w)| w * (threshold - value(item)))
            .collect(),
        weights: weights.to_vec(),
        scale: 1.0,
    }
}

fn macro_weight(item: &NormalizedItem, basis: MacroBasis) -> f64 {
    match basis {
        MacroBasis::Calories => item.calories_per_unit(),
        MacroBasis::Weight => 1.0,
    }
}

/// Achieved macro averages and treat share for a set of quantities.
pub fn summarize(
    items: &[NormalizedItem],
    quantities: &[f64],
    config: &PlannerConfig,
) -> MacroSummary {
    let mut weight_total = 0.0;
    let mut protein = 0.0;
    let mut fat = 0.0;
    let mut carbs = 0.0;
    let mut calories = 0.0;
    let mut treat_calories = 0.0;

    for (item, &q) in items.iter().zip(quantities) {
        let w = macro_weight(item, config.macro_basis) * q;
        weight_total += w;
        protein += w * item.protein_pct();
        fat += w * item.fat_pct();
        carbs += w * item.corrected_carbs_pct(config.carb_overestimation_factor);

        let cal = item.calories_per_unit() * q;
        calories += cal;
        if item.is_treat() {
            treat_calories += cal;
        }
    }

    if weight_total <= 0.0 {
        return MacroSummary::default();
    }

    MacroSummary {
        protein_pct: protein / weight_total,
        fat_pct: fat / weight_total,
        corrected_carbs_pct: carbs / weight_total,
        treat_calorie_share: if calories > 0.0 {
            treat_calories / calories
        } else {
            0.0
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CarbSource, ItemKind};

    fn item(name: &str, kind: ItemKind, cal: f64, p: f64, f: f64, c: f64) -> NormalizedItem {
        NormalizedItem::from_dry_matter(name, kind, cal, p, f, c, CarbSource::Computed).unwrap()
    }

    #[test]
    fn test_empty_items_rejected() {
        let config = PlannerConfig::default();
        let err = ConstraintBuilder::new(&[], 50.0, &config).build().unwrap_err();
        assert!(matches!(err, FeedError::EmptyItemSet));
    }

    #[test]
    fn test_non_positive_target_rejected() {
        let config = PlannerConfig::default();
        let items = vec![item("a", ItemKind::Food, 30.0, 60.0, 50.0, 1.0)];
        let err = ConstraintBuilder::new(&items, 0.0, &config).build().unwrap_err();
        assert!(matches!(err, FeedError::InvalidConfig(_)));
    }

    #[test]
    fn test_row_coefficients() {
        let config = PlannerConfig::default();
        let items = vec![
            item("food", ItemKind::Food, 30.0, 60.0, 50.0, 2.0),
            item("treat", ItemKind::Treat, 100.0, 40.0, 30.0, 10.0),
        ];
        let problem = ConstraintBuilder::new(&items, 50.0, &config).build().unwrap();

        assert_eq!(problem.objective, vec![1.0, 1.0]);
        assert_eq!(problem.calorie_row, vec![30.0, 100.0]);

        let protein = &problem.inequality_rows[0];
        assert_eq!(protein.kind, RowKind::ProteinMin);
        assert!((protein.coefficients[0] - 30.0 * (55.0 - 60.0)).abs() < 1e-9);
        assert!((protein.coefficients[1] - 100.0 * (55.0 - 40.0)).abs() < 1e-9);

        let carbs = &problem.inequality_rows[2];
        assert!((carbs.coefficients[0] - 30.0 * (2.0 * 0.79 - 2.0)).abs() < 1e-9);

        let cap = &problem.inequality_rows[3];
        assert!((cap.coefficients[0] - 30.0 * -0.1).abs() < 1e-9);
        assert!((cap.coefficients[1] - 100.0 * 0.9).abs() < 1e-9);
        assert_eq!(problem.treat_mask, vec![false, true]);
    }

    #[test]
    fn test_weight_basis_uses_unit_weights() {
        let config = PlannerConfig {
            macro_basis: MacroBasis::Weight,
            ..Default::default()
        };
        let items = vec![item("food", ItemKind::Food, 30.0, 60.0, 50.0, 2.0)];
        let problem = ConstraintBuilder::new(&items, 50.0, &config).build().unwrap();
        assert!((problem.inequality_rows[0].coefficients[0] - (55.0 - 60.0)).abs() < 1e-9);
    }

    #[test]
    fn test_bound_override() {
        let config = PlannerConfig::default();
        let items = vec![
            item("food", ItemKind::Food, 30.0, 60.0, 50.0, 2.0),
            item("treat", ItemKind::Treat, 100.0, 40.0, 30.0, 10.0),
        ];
        let problem = ConstraintBuilder::new(&items, 50.0, &config)
            .with_bound(1, Bound::at_least(0.05))
            .build()
            .unwrap();
        assert_eq!(problem.bounds[0], Bound::NON_NEGATIVE);
        assert_eq!(problem.bounds[1].lower, 0.05);

        let out_of_range = ConstraintBuilder::new(&items, 50.0, &config)
            .with_bound(5, Bound::at_least(0.05))
            .build();
        assert!(out_of_range.is_err());
    }

    #[test]
    fn test_violation_in_percentage_points() {
        let config = PlannerConfig::default();
        let items = vec![item("food", ItemKind::Food, 30.0, 50.0, 50.0, 0.0)];
        let problem = ConstraintBuilder::new(&items, 30.0, &config).build().unwrap();
        // 50% protein against a 55% floor.
        assert!((problem.inequality_rows[0].violation(&[1.0]) - 5.0).abs() < 1e-9);
        assert_eq!(problem.inequality_rows[1].violation(&[1.0]), 0.0);
    }

    #[test]
    fn test_feasibility_check() {
        let config = PlannerConfig::default();
        let items = vec![item("food", ItemKind::Food, 30.0, 60.0, 50.0, 1.0)];
        let problem = ConstraintBuilder::new(&items, 30.0, &config).build().unwrap();
        assert!(problem.is_feasible(&[1.0], CalorieRule::Exact, 1e-6));
        assert!(!problem.is_feasible(&[1.005], CalorieRule::Exact, 1e-6));
        assert!(problem.is_feasible(&[1.005], CalorieRule::Band(0.01), 1e-6));
        assert!(!problem.is_feasible(&[-0.5], CalorieRule::Band(0.01), 1e-6));
    }

    #[test]
    fn test_summarize() {
        let config = PlannerConfig::default();
        let items = vec![
            item("food", ItemKind::Food, 30.0, 60.0, 50.0, 2.0),
            item("treat", ItemKind::Treat, 10.0, 40.0, 30.0, 10.0),
        ];
        let summary = summarize(&items, &[1.0, 1.0], &config);
        // Calorie-weighted: (30*60 + 10*40) / 40
        assert!((summary.protein_pct - 55.0).abs() < 1e-9);
        assert!((summary.treat_calorie_share - 0.25).abs() < 1e-9);
    }
}
