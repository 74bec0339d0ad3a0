use std::cmp::Ordering;

use crate::error::{MixError, Result};
use crate::models::{Ingredient, TargetNutrition};
use crate::optimizer::{optimize_mix, OptimizerConfig};
use crate::tuner::knobs::{KnobRanges, TunerKnobs};

/// Residual charged to a seed whose solve left every ingredient at 0%.
pub const DEGENERATE_RMS: f64 = 1.0;

/// Result of a single seeded solve.
#[derive(Debug, Clone)]
pub struct SeedResult {
    pub seed: u64,
    pub rms: f64,
    pub energy: f64,
    pub elapsed_ms: f64,
    pub degenerate: bool,
}

/// Aggregated result of evaluating knobs across multiple seeds.
#[derive(Debug, Clone)]
pub struct EvaluationResult {
    pub knobs: TunerKnobs,
    pub mean_rms: f64,
    pub worst_rms: f64,
    pub degenerate_count: usize,
    pub mean_elapsed_ms: f64,
    pub per_seed: Vec<SeedResult>,
}

impl EvaluationResult {
    /// Lexicographic comparison: (mean_rms, degenerate_count, mean_elapsed_ms).
    /// Lower is better for all metrics; `Greater` means `self` is better.
    pub fn cmp_score(&self, other: &Self) -> Ordering {
        match other.mean_rms.partial_cmp(&self.mean_rms) {
            Some(Ordering::Equal) | None => {}
            Some(ord) => return ord,
        }
        match other.degenerate_count.cmp(&self.degenerate_count) {
            Ordering::Equal => {}
            ord => return ord,
        }
        other
            .mean_elapsed_ms
            .partial_cmp(&self.mean_elapsed_ms)
            .unwrap_or(Ordering::Equal)
    }

    pub fn is_better_than(&self, other: &Self) -> bool {
        self.cmp_score(other) == Ordering::Greater
    }
}

/// Solve once with `config` fixed to `seed`.
///
/// A degenerate mix is scored rather than reported as an error.
pub fn evaluate_seed(
    ingredients: &[Ingredient],
    target: &TargetNutrition,
    config: &OptimizerConfig,
    seed: u64,
) -> Result<SeedResult> {
    let mut config = config.clone();
    config.anneal.seed = Some(seed);

    match optimize_mix(ingredients, target, &config) {
        Ok(optimization) => Ok(SeedResult {
            seed,
            rms: optimization.residual.rms,
            energy: optimization.energy,
            elapsed_ms: optimization.stats.elapsed.as_secs_f64() * 1000.0,
            degenerate: false,
        }),
        Err(MixError::DegenerateResult) => Ok(SeedResult {
            seed,
            rms: DEGENERATE_RMS,
            energy: f64::NAN,
            elapsed_ms: 0.0,
            degenerate: true,
        }),
        Err(e) => Err(e),
    }
}

/// Evaluate knobs on `base` across all seeds.
pub fn evaluate_knobs(
    knobs: &TunerKnobs,
    ingredients: &[Ingredient],
    target: &TargetNutrition,
    base: &OptimizerConfig,
    seeds: &[u64],
) -> Result<EvaluationResult> {
    let config = knobs.apply(base);
    let per_seed = seeds
        .iter()
        .map(|&seed| evaluate_seed(ingredients, target, &config, seed))
        .collect::<Result<Vec<_>>>()?;

    let n = per_seed.len().max(1) as f64;
    let mean_rms = per_seed.iter().map(|r| r.rms).sum::<f64>() / n;
    let worst_rms = per_seed.iter().map(|r| r.rms).fold(0.0, f64::max);
    let degenerate_count = per_seed.iter().filter(|r| r.degenerate).count();
    let mean_elapsed_ms = per_seed.iter().map(|r| r.elapsed_ms).sum::<f64>() / n;

    Ok(EvaluationResult {
        knobs: knobs.clone(),
        mean_rms,
        worst_rms,
        degenerate_count,
        mean_elapsed_ms,
        per_seed,
    })
}

/// Configuration for coordinate-wise hill climbing.
#[derive(Debug, Clone)]
pub struct HillClimbConfig {
    /// Initial relative step applied to each knob.
    pub initial_step: f64,
    /// Stop once the step shrinks below this.
    pub min_step: f64,
    pub max_rounds: usize,
}

impl Default for HillClimbConfig {
    fn default() -> Self {
        Self {
            initial_step: 0.2,
            min_step: 0.02,
            max_rounds: 10,
        }
    }
}

/// Refine `start` by scaling one knob at a time up and down.
///
/// The step halves whenever a full round over all knobs finds nothing better.
pub fn hill_climb(
    start: &EvaluationResult,
    ingredients: &[Ingredient],
    target: &TargetNutrition,
    base: &OptimizerConfig,
    seeds: &[u64],
    ranges: &KnobRanges,
    config: &HillClimbConfig,
) -> Result<EvaluationResult> {
    let mut best = start.clone();
    let mut step = config.initial_step;

    for _ in 0..config.max_rounds {
        if step < config.min_step {
            break;
        }

        let mut improved = false;
        for knob_idx in 0..TunerKnobs::NUM_KNOBS {
            for factor in [1.0 + step, 1.0 - step] {
                let candidate_knobs = best.knobs.perturb(knob_idx, factor, ranges);
                if candidate_knobs == best.knobs {
                    continue;
                }
                let candidate =
                    evaluate_knobs(&candidate_knobs, ingredients, target, base, seeds)?;
                if candidate.is_better_than(&best) {
                    best = candidate;
                    improved = true;
                }
            }
        }

        if !improved {
            step /= 2.0;
        }
    }

    Ok(best)
}
