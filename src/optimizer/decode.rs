use crate::error::{MixError, Result};
use crate::models::{
    Nutrient, NutrientProfile, NutritionReport, OptimizationResult, ProportionResult,
};
use crate::optimizer::constants::PERCENT;
use crate::optimizer::encoding::FixedPoint;
use crate::optimizer::objective::NormalizedProblem;

/// Relative deviation of the mix from the target, per optimized nutrient.
///
/// Nutrients with a zero target are left out. A large `rms` is how a poorly
/// converged solve shows up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Residual {
    pub per_nutrient: Vec<(Nutrient, f64)>,
    pub rms: f64,
}

/// Decoded proportions in percent, before renormalization.
pub fn decode_percentages(
    assignment: &[bool],
    problem: &NormalizedProblem,
    encoding: &FixedPoint,
) -> Vec<f64> {
    (0..problem.len())
        .map(|i| encoding.decode_ingredient(assignment, i) * PERCENT)
        .collect()
}

/// Rescale `percentages` to sum to 100.
///
/// Returns false and leaves the values untouched when they sum to zero.
pub fn renormalize(percentages: &mut [f64]) -> bool {
    let total: f64 = percentages.iter().sum();
    if total <= 0.0 {
        return false;
    }
    for p in percentages.iter_mut() {
        *p = *p / total * PERCENT;
    }
    true
}

/// Nutrition of the mix, per gram and for the whole batch.
///
/// Optimized nutrients go through the normalized values times the per-gram
/// target, so a nutrient with a zero target reports zero. Salt is mixed
/// directly.
pub fn nutrition_report(problem: &NormalizedProblem, percentages: &[f64]) -> NutritionReport {
    let mut per_gram = NutrientProfile::default();

    for (ingredient, percent) in problem.ingredients.iter().zip(percentages) {
        let share = percent / PERCENT;
        for nutrient in Nutrient::OPTIMIZED {
            *per_gram.get_mut(nutrient) +=
                ingredient.norm(nutrient) * problem.target_per_gram.get(nutrient) * share;
        }
        per_gram.salt += ingredient.per_gram.salt * share;
    }

    let total = per_gram.scaled(problem.total_amount);
    NutritionReport { per_gram, total }
}

pub fn residual(problem: &NormalizedProblem, report: &NutritionReport) -> Residual {
    let per_nutrient: Vec<(Nutrient, f64)> = Nutrient::OPTIMIZED
        .into_iter()
        .filter_map(|nutrient| {
            let target = problem.target_per_gram.get(nutrient);
            (target > 0.0).then(|| (nutrient, (report.per_gram.get(nutrient) - target) / target))
        })
        .collect();

    let rms = if per_nutrient.is_empty() {
        0.0
    } else {
        let mean_sq =
            per_nutrient.iter().map(|(_, d)| d * d).sum::<f64>() / per_nutrient.len() as f64;
        mean_sq.sqrt()
    };

    Residual { per_nutrient, rms }
}

/// Turn a solver assignment into proportions and a nutrition report.
///
/// An empty problem yields an empty result. A non-empty problem whose
/// proportions all decode to zero is a `DegenerateResult`.
pub fn decode_result(
    assignment: &[bool],
    problem: &NormalizedProblem,
    encoding: &FixedPoint,
) -> Result<OptimizationResult> {
    let mut percentages = decode_percentages(assignment, problem, encoding);

    if !problem.is_empty() && !renormalize(&mut percentages) {
        return Err(MixError::DegenerateResult);
    }

    let mut proportions = ProportionResult::new();
    for (ingredient, percent) in problem.ingredients.iter().zip(&percentages) {
        proportions.insert(&ingredient.name, *percent);
    }

    Ok(OptimizationResult {
        proportions,
        calculated_nutrition: nutrition_report(problem, &percentages),
    })
}
