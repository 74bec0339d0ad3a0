pub mod cli;
pub mod error;
pub mod interface;
pub mod models;
pub mod optimizer;
pub mod solver;
pub mod state;
pub mod tuner;

pub use error::{MixError, Result};
pub use models::{Ingredient, OptimizationResult, TargetNutrition};
pub use optimizer::{optimize_mix, OptimizerConfig};
