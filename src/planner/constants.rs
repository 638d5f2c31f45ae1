// ─────────────────────────────────────────────────────────────────────────────
// Weight conversion (canonical unit: ounce)
// ─────────────────────────────────────────────────────────────────────────────

/// Grams in one avoirdupois ounce.
pub const GRAMS_PER_OUNCE: f64 = 28.349_523_125;

/// Ounces in one pound.
pub const OUNCES_PER_POUND: f64 = 16.0;

// ─────────────────────────────────────────────────────────────────────────────
// Energy requirement
// ─────────────────────────────────────────────────────────────────────────────

/// Resting energy: RER = RER_PER_KG * weight_kg + RER_BASE.
pub const RER_PER_KG: f64 = 30.0;
pub const RER_BASE: f64 = 70.0;

pub const ACTIVITY_FACTOR_LOW: f64 = 1.2;
pub const ACTIVITY_FACTOR_MEDIUM: f64 = 1.5;
pub const ACTIVITY_FACTOR_HIGH: f64 = 2.0;

/// Energy multiplier for neutered cats.
pub const NEUTERED_FACTOR: f64 = 0.8;

// ─────────────────────────────────────────────────────────────────────────────
// Nutrition targets (dry-matter percentages)
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_PROTEIN_MIN_PCT: f64 = 55.0;
pub const DEFAULT_FAT_MIN_PCT: f64 = 45.0;
pub const DEFAULT_CARBS_MAX_PCT: f64 = 2.0;

/// Maximum share of meal calories that may come from treats.
pub const DEFAULT_TREAT_CALORIE_CAP: f64 = 0.10;

/// Crude-fiber labels overstate carbs computed by difference by about 21%.
pub const DEFAULT_CARB_OVERESTIMATION_FACTOR: f64 = 0.21;

// ─────────────────────────────────────────────────────────────────────────────
// Solver tuning
// ─────────────────────────────────────────────────────────────────────────────

/// Relative tolerance for accepting a linear solution as feasible.
pub const DEFAULT_FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Half-width of the calorie band used by the relaxed tier (fraction of target).
pub const DEFAULT_CALORIE_BAND: f64 = 0.01;

/// Smallest quantity (oz) that counts as "including" a forced treat.
pub const DEFAULT_MIN_TREAT_QUANTITY: f64 = 0.05;

pub const DEFAULT_BEST_EFFORT_ITERATIONS: usize = 500;
pub const DEFAULT_BEST_EFFORT_RESTARTS: usize = 4;
pub const DEFAULT_BEST_EFFORT_SEED: u64 = 42;

/// Weight of the total-quantity term in the best-effort objective.
pub const BEST_EFFORT_QUANTITY_WEIGHT: f64 = 0.01;

/// Quantities below this are reported as zero.
pub const QUANTITY_EPSILON: f64 = 1e-9;
