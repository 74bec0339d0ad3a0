use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{MixError, Result};
use crate::models::{
    AnalysisResponse, Ingredient, IngredientList, OptimizationResult, TargetNutrition,
};
use crate::optimizer::constants::{BITS_PER_INGREDIENT, MAX_BITS_PER_INGREDIENT};
use crate::optimizer::decode::{decode_result, residual, Residual};
use crate::optimizer::encoding::FixedPoint;
use crate::optimizer::objective::{
    LinearTerm, NormalizedProblem, ObjectiveBuilder, PenaltyMode, PenaltyWeights,
};
use crate::optimizer::qubo::Qubo;
use crate::solver::{AnnealConfig, SimulatedAnnealer, SolveStats};

/// Everything that shapes one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub bits_per_ingredient: usize,
    pub weights: PenaltyWeights,
    pub penalty_mode: PenaltyMode,
    pub linear_term: LinearTerm,
    pub anneal: AnnealConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            bits_per_ingredient: BITS_PER_INGREDIENT,
            weights: PenaltyWeights::default(),
            penalty_mode: PenaltyMode::default(),
            linear_term: LinearTerm::default(),
            anneal: AnnealConfig::default(),
        }
    }
}

impl OptimizerConfig {
    pub fn encoding(&self) -> FixedPoint {
        FixedPoint::new(self.bits_per_ingredient)
    }
}

/// Result of `optimize_mix` along with solver diagnostics.
#[derive(Debug, Clone)]
pub struct Optimization {
    pub result: OptimizationResult,
    /// Objective energy of the chosen assignment, excluding the constant offset.
    pub energy: f64,
    pub residual: Residual,
    pub stats: SolveStats,
    pub num_variables: usize,
}

impl Optimization {
    /// Wrap with the pass-through ingredient data.
    pub fn into_response(self, ingredients: IngredientList) -> AnalysisResponse {
        AnalysisResponse {
            ingredients,
            optimization_result: self.result,
        }
    }
}

/// Check inputs before any work is done.
pub fn validate(
    ingredients: &[Ingredient],
    target: &TargetNutrition,
    config: &OptimizerConfig,
) -> Result<()> {
    if ingredients.is_empty() {
        return Err(MixError::InvalidInput("no ingredients supplied".to_string()));
    }
    validate_values(ingredients, target, config)
}

/// Range checks on the target, nutrition values and bit count.
///
/// An empty ingredient list passes; it builds an empty objective.
pub fn validate_values(
    ingredients: &[Ingredient],
    target: &TargetNutrition,
    config: &OptimizerConfig,
) -> Result<()> {
    if !(target.total_amount.is_finite() && target.total_amount > 0.0) {
        return Err(MixError::InvalidInput(format!(
            "total_amount must be positive, got {}",
            target.total_amount
        )));
    }

    let target_values = [
        target.calories,
        target.protein,
        target.fat,
        target.carbs,
        target.salt,
    ];
    if target_values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(MixError::InvalidInput(
            "target nutrients must be non-negative".to_string(),
        ));
    }

    if let Some(bad) = ingredients
        .iter()
        .find(|i| !i.nutrition_per_100g.is_valid())
    {
        return Err(MixError::InvalidInput(format!(
            "nutrition values of '{}' must be non-negative",
            bad.name
        )));
    }

    if !(1..=MAX_BITS_PER_INGREDIENT).contains(&config.bits_per_ingredient) {
        return Err(MixError::InvalidInput(format!(
            "bits_per_ingredient must be between 1 and {}, got {}",
            MAX_BITS_PER_INGREDIENT, config.bits_per_ingredient
        )));
    }

    Ok(())
}

/// Build the objective for `ingredients` without solving it.
pub fn build_objective(
    ingredients: &[Ingredient],
    target: &TargetNutrition,
    config: &OptimizerConfig,
) -> Result<(NormalizedProblem, Qubo)> {
    validate_values(ingredients, target, config)?;

    let problem = NormalizedProblem::new(ingredients, target)?;
    let encoding = config.encoding();
    let qubo = ObjectiveBuilder::new(&problem, &encoding)
        .weights(config.weights.clone())
        .penalty_mode(config.penalty_mode)
        .linear_term(config.linear_term)
        .build();
    Ok((problem, qubo))
}

/// Recommend proportions of `ingredients` that best match `target`.
pub fn optimize_mix(
    ingredients: &[Ingredient],
    target: &TargetNutrition,
    config: &OptimizerConfig,
) -> Result<Optimization> {
    validate(ingredients, target, config)?;

    for ingredient in ingredients {
        debug!("{}", ingredient.debug_string());
    }
    debug!("target: {}", target.debug_string());

    let (problem, qubo) = build_objective(ingredients, target, config)?;
    info!(
        "objective over {} variables ({:?} magnitude term)",
        qubo.num_variables(),
        config.penalty_mode
    );

    let (solution, stats) = SimulatedAnnealer::new(config.anneal.clone()).solve(&qubo);

    let result = decode_result(&solution.assignment, &problem, &config.encoding())?;
    let residual = residual(&problem, &result.calculated_nutrition);
    if residual.rms > 0.5 {
        warn!(
            "mix is far from target (rms relative deviation {:.3})",
            residual.rms
        );
    }

    Ok(Optimization {
        result,
        energy: solution.energy,
        residual,
        stats,
        num_variables: qubo.num_variables(),
    })
}

/// Optimize and wrap the result with the pass-through ingredients.
pub fn analyze(
    ingredients: IngredientList,
    target: &TargetNutrition,
    config: &OptimizerConfig,
) -> Result<AnalysisResponse> {
    let optimization = optimize_mix(&ingredients.ingredients, target, config)?;
    Ok(optimization.into_response(ingredients))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutritionPer100g;

    fn ingredient(name: &str, calories: f64) -> Ingredient {
        Ingredient::new(
            name,
            "test",
            NutritionPer100g {
                calories,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_validate_rejects_empty() {
        let err = validate(&[], &TargetNutrition::default(), &OptimizerConfig::default());
        assert!(matches!(err, Err(MixError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_bad_total() {
        let target = TargetNutrition {
            total_amount: 0.0,
            ..Default::default()
        };
        let err = validate(&[ingredient("A", 1.0)], &target, &OptimizerConfig::default());
        assert!(matches!(err, Err(MixError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_negative_nutrition() {
        let err = validate(
            &[ingredient("A", -10.0)],
            &TargetNutrition::default(),
            &OptimizerConfig::default(),
        );
        assert!(matches!(err, Err(MixError::InvalidInput(msg)) if msg.contains("'A'")));
    }

    #[test]
    fn test_validate_rejects_bit_count() {
        let config = OptimizerConfig {
            bits_per_ingredient: 0,
            ..Default::default()
        };
        let err = validate(&[ingredient("A", 1.0)], &TargetNutrition::default(), &config);
        assert!(matches!(err, Err(MixError::InvalidInput(_))));
    }

    #[test]
    fn test_build_objective_rejects_bad_values() {
        let config = OptimizerConfig {
            bits_per_ingredient: 10_000,
            ..Default::default()
        };
        let err = build_objective(&[ingredient("A", 1.0)], &TargetNutrition::default(), &config);
        assert!(matches!(err, Err(MixError::InvalidInput(_))));

        let err = build_objective(
            &[ingredient("A", f64::NAN)],
            &TargetNutrition::default(),
            &OptimizerConfig::default(),
        );
        assert!(matches!(err, Err(MixError::InvalidInput(msg)) if msg.contains("'A'")));
    }

    #[test]
    fn test_build_objective_allows_empty_list() {
        let (problem, qubo) =
            build_objective(&[], &TargetNutrition::default(), &OptimizerConfig::default())
                .unwrap();
        assert!(problem.is_empty());
        assert!(qubo.is_empty());
    }

    #[test]
    fn test_build_objective_size() {
        let (problem, qubo) = build_objective(
            &[ingredient("A", 100.0), ingredient("B", 200.0)],
            &TargetNutrition::default(),
            &OptimizerConfig::default(),
        )
        .unwrap();
        assert_eq!(problem.len(), 2);
        assert_eq!(qubo.num_variables(), 2 * BITS_PER_INGREDIENT);
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: OptimizerConfig =
            serde_json::from_str(r#"{"penalty_mode": "normalized", "anneal": {"num_reads": 4}}"#)
                .unwrap();
        assert_eq!(config.penalty_mode, PenaltyMode::Normalized);
        assert_eq!(config.anneal.num_reads, 4);
        assert_eq!(config.anneal.num_sweeps, AnnealConfig::default().num_sweeps);
        assert_eq!(config.bits_per_ingredient, BITS_PER_INGREDIENT);
    }
}
