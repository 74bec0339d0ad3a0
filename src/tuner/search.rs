use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::error::Result;
use crate::models::{Ingredient, TargetNutrition};
use crate::optimizer::{validate, OptimizerConfig};
use crate::tuner::evaluation::{evaluate_knobs, hill_climb, EvaluationResult, HillClimbConfig};
use crate::tuner::knobs::{KnobRanges, TunerKnobs};

/// Configuration for the tuner.
pub struct TunerConfig {
    pub iterations: usize,
    pub seed: u64,
    /// Solver seeds every candidate is scored on.
    pub eval_seeds: Vec<u64>,
    pub ranges: KnobRanges,
    /// Settings the knobs are applied on top of.
    pub base: OptimizerConfig,
    pub topk: usize,
    /// Hill climbing configuration. Set to None to disable.
    pub hill_climb: Option<HillClimbConfig>,
}

impl Default for TunerConfig {
    fn default() -> Self {
        let mut base = OptimizerConfig::default();
        base.anneal.num_reads = 20;
        Self {
            iterations: 100,
            seed: 123,
            eval_seeds: vec![1, 2, 3, 4],
            ranges: KnobRanges::default(),
            base,
            topk: 10,
            hill_climb: Some(HillClimbConfig::default()),
        }
    }
}

/// Results from a tuning run.
pub struct TunerResults {
    /// All evaluation results, sorted best to worst.
    pub results: Vec<EvaluationResult>,
    /// The baseline result using the base configuration's own knobs.
    pub baseline: EvaluationResult,
}

impl TunerResults {
    pub fn best(&self) -> &EvaluationResult {
        self.results.first().unwrap_or(&self.baseline)
    }
}

/// Run random-search tuning over annealing and penalty knobs.
pub fn run_tuner(
    config: &TunerConfig,
    ingredients: &[Ingredient],
    target: &TargetNutrition,
) -> Result<TunerResults> {
    validate(ingredients, target, &config.base)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut results = Vec::with_capacity(config.iterations + 1);
    let seeds = &config.eval_seeds;

    let baseline_knobs = TunerKnobs::from_config(&config.base);
    let baseline = evaluate_knobs(&baseline_knobs, ingredients, target, &config.base, seeds)?;

    println!(
        "Baseline: rms={:.5} worst={:.5} degenerate={}",
        baseline.mean_rms, baseline.worst_rms, baseline.degenerate_count
    );
    println!("    {}\n", baseline_knobs.display());

    println!("Running {} iterations...", config.iterations);

    let mut best_rms = baseline.mean_rms;

    for i in 0..config.iterations {
        let knobs = TunerKnobs::random(&mut rng, &config.ranges);
        let result = evaluate_knobs(&knobs, ingredients, target, &config.base, seeds)?;

        if result.mean_rms < best_rms {
            best_rms = result.mean_rms;
            println!(
                "[{}/{}] New best: rms={:.5} worst={:.5} degenerate={}",
                i + 1,
                config.iterations,
                result.mean_rms,
                result.worst_rms,
                result.degenerate_count
            );
        }

        results.push(result);

        if (i + 1) % (config.iterations / 10).max(1) == 0 {
            let pct = ((i + 1) as f64 / config.iterations as f64) * 100.0;
            eprint!("\r{:.0}% complete", pct);
        }
    }
    eprintln!();

    results.push(baseline.clone());
    results.sort_by(|a, b| b.cmp_score(a));

    if let Some(ref hc_config) = config.hill_climb {
        let n = config.topk.min(results.len());
        println!("Refining top {} results with hill climbing...", n);

        let mut refined_count = 0;
        for idx in 0..n {
            let original = &results[idx];
            let refined = hill_climb(
                original,
                ingredients,
                target,
                &config.base,
                seeds,
                &config.ranges,
                hc_config,
            )?;
            if refined.is_better_than(original) {
                refined_count += 1;
                results.push(refined);
            }
        }

        if refined_count > 0 {
            println!("  {} results improved by hill climbing", refined_count);
            results.sort_by(|a, b| b.cmp_score(a));
        } else {
            println!("  No improvements found (already at local optima)");
        }
    }

    info!(
        "tuning finished: {} candidates, best rms {:.5}",
        results.len(),
        results.first().map_or(f64::NAN, |r| r.mean_rms)
    );

    Ok(TunerResults { results, baseline })
}
