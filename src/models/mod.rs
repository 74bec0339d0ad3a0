mod ingredient;
mod report;
mod target;

pub use ingredient::{Ingredient, IngredientList, NutritionPer100g};
pub use report::{
    AnalysisResponse, NutrientProfile, NutritionReport, OptimizationResult, ProportionResult,
};
pub use target::{Nutrient, TargetNutrition};
