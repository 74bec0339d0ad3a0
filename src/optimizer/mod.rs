pub mod constants;
pub mod decode;
pub mod encoding;
pub mod objective;
pub mod pipeline;
pub mod qubo;

pub use constants::*;
pub use decode::{
    decode_percentages, decode_result, nutrition_report, renormalize, residual, Residual,
};
pub use encoding::{bit_weight, BitVariable, FixedPoint};
pub use objective::{
    nutrient_penalty, LinearTerm, NormalizedIngredient, NormalizedProblem, ObjectiveBuilder,
    PenaltyMode, PenaltyWeights,
};
pub use pipeline::{
    analyze, build_objective, optimize_mix, validate, validate_values, Optimization,
    OptimizerConfig,
};
pub use qubo::{Qubo, QuboSummary};
