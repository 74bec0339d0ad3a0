/// Binary digits used to encode each ingredient's proportion.
pub const BITS_PER_INGREDIENT: usize = 16;

/// Largest supported digit count; beyond this `f64` cannot hold the weights exactly.
pub const MAX_BITS_PER_INGREDIENT: usize = 52;

/// Weight of the total-mass penalty term.
pub const MAGNITUDE_PENALTY_WEIGHT: f64 = 100.0;

/// Weights of the four nutrient deviation terms.
pub const CALORIES_PENALTY_WEIGHT: f64 = 1.0;
pub const PROTEIN_PENALTY_WEIGHT: f64 = 1.0;
pub const FAT_PENALTY_WEIGHT: f64 = 1.0;
pub const CARBS_PENALTY_WEIGHT: f64 = 1.0;

/// Ingredient nutrition is quoted per this many grams.
pub const GRAMS_PER_QUOTE: f64 = 100.0;

/// Batch size in grams when a target omits `total_amount`.
pub const DEFAULT_TOTAL_AMOUNT: f64 = 100.0;

/// Proportions are reported as percentages.
pub const PERCENT: f64 = 100.0;

// ─────────────────────────────────────────────────────────────────────────────
// Annealing defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Independent annealing reads per solve.
pub const DEFAULT_NUM_READS: usize = 100;

/// Sweeps over all variables per read.
pub const DEFAULT_NUM_SWEEPS: usize = 1000;

/// Probability of accepting the largest possible uphill flip at the start.
pub const HOT_ACCEPTANCE: f64 = 0.5;

/// Probability of accepting the smallest non-zero uphill flip at the end.
pub const COLD_ACCEPTANCE: f64 = 0.01;

/// Tolerance for "proportions sum to 100".
pub const PROPORTION_TOLERANCE: f64 = 1e-6;
