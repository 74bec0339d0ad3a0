use std::path::PathBuf;

use clap::Parser;

use nutri_mix_rs::cli::TargetArgs;
use nutri_mix_rs::error::{MixError, Result};
use nutri_mix_rs::models::TargetNutrition;
use nutri_mix_rs::optimizer::OptimizerConfig;
use nutri_mix_rs::state::{load_config, load_ingredients, load_target};
use nutri_mix_rs::tuner::{
    print_topk, run_tuner, write_best_json, write_csv, HillClimbConfig, KnobRanges, TunerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "tuner")]
#[command(about = "Annealing parameter tuner for the nutrition mix optimizer")]
struct Args {
    /// Number of random search iterations
    #[arg(long, default_value = "100")]
    iters: usize,

    /// Random seed for the search itself
    #[arg(long, default_value = "123")]
    seed: u64,

    /// Solver seeds each candidate is scored on (comma-separated)
    #[arg(long, default_value = "1,2,3,4")]
    eval_seeds: String,

    /// Annealing reads per solve
    #[arg(long, default_value = "20")]
    reads: usize,

    /// Path to the ingredient list (JSON or CSV)
    #[arg(short, long, default_value = "ingredients.json")]
    ingredients: PathBuf,

    /// Base optimizer configuration JSON
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    target: TargetArgs,

    /// Output CSV file for all results
    #[arg(long, default_value = "tuner_results.csv")]
    csv: PathBuf,

    /// Output JSON file for the best configuration
    #[arg(long, default_value = "tuner_best.json")]
    json: PathBuf,

    /// Number of top results to display
    #[arg(long, default_value = "10")]
    topk: usize,

    /// Disable hill climbing refinement
    #[arg(long)]
    no_hill_climb: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_seeds(s: &str) -> Vec<u64> {
    s.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let list = load_ingredients(&args.ingredients)?;
    println!("Loaded {} ingredients from {:?}", list.len(), args.ingredients);

    let base_target = match &args.target.target {
        Some(path) => load_target(path)?,
        None => TargetNutrition::default(),
    };
    let target = args.target.apply(base_target);
    println!("Target: {}", target.debug_string());

    let eval_seeds = parse_seeds(&args.eval_seeds);
    if eval_seeds.is_empty() {
        return Err(MixError::InvalidInput(
            "no valid evaluation seeds provided".to_string(),
        ));
    }
    println!("Scoring on seeds: {:?}", eval_seeds);

    let mut base = match &args.config {
        Some(path) => load_config(path)?,
        None => OptimizerConfig::default(),
    };
    base.anneal.num_reads = args.reads;
    base.anneal.time_limit_ms = None;

    let hill_climb = if args.no_hill_climb {
        None
    } else {
        Some(HillClimbConfig::default())
    };

    let config = TunerConfig {
        iterations: args.iters,
        seed: args.seed,
        eval_seeds,
        ranges: KnobRanges::default(),
        base,
        topk: args.topk,
        hill_climb,
    };

    let tuner_results = run_tuner(&config, &list.ingredients, &target)?;

    print_topk(&tuner_results.results, args.topk);

    let best = tuner_results.best();
    let baseline = &tuner_results.baseline;

    println!("=== Comparison: Best vs Baseline ===");
    println!(
        "Baseline: rms={:.5} worst={:.5} degenerate={}",
        baseline.mean_rms, baseline.worst_rms, baseline.degenerate_count
    );
    println!(
        "Best:     rms={:.5} worst={:.5} degenerate={}",
        best.mean_rms, best.worst_rms, best.degenerate_count
    );
    println!("Change:   rms {:+.5}", best.mean_rms - baseline.mean_rms);
    println!();

    if let Err(e) = write_csv(&tuner_results.results, &args.csv) {
        eprintln!("Error writing CSV: {}", e);
    } else {
        println!("Wrote all results to {:?}", args.csv);
    }

    if let Err(e) = write_best_json(best, &config.base, &args.json) {
        eprintln!("Error writing JSON: {}", e);
    } else {
        println!("Wrote best configuration to {:?} (use with --config)", args.json);
    }

    Ok(())
}
