use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::TargetNutrition;
use crate::optimizer::{OptimizerConfig, PenaltyMode};

/// nutri-mix: find ingredient proportions that hit a nutrition target.
#[derive(Parser, Debug)]
#[command(name = "nutri-mix")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the ingredient list (JSON from the extraction service, or CSV).
    #[arg(short, long, default_value = "ingredients.json", global = true)]
    pub ingredients: PathBuf,

    /// Optimizer configuration JSON (for example the tuner's output).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Optimize ingredient proportions against a target.
    Optimize {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        solver: SolverArgs,

        /// Prompt for the target and penalty mode.
        #[arg(long)]
        interactive: bool,

        /// Write the full response JSON here.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write `name,percent` rows here.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Build the objective and print its size without solving.
    Objective {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        solver: SolverArgs,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Optimize {
            target: TargetArgs::default(),
            solver: SolverArgs::default(),
            interactive: false,
            output: None,
            csv: None,
        }
    }
}

/// Target nutrition for the whole batch. Unset fields use the target file or defaults.
#[derive(Args, Debug, Default, Clone)]
pub struct TargetArgs {
    /// Target JSON file.
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// Calories (kcal) for the whole batch.
    #[arg(long)]
    pub calories: Option<f64>,

    /// Protein (g) for the whole batch.
    #[arg(long)]
    pub protein: Option<f64>,

    /// Fat (g) for the whole batch.
    #[arg(long)]
    pub fat: Option<f64>,

    /// Carbohydrates (g) for the whole batch.
    #[arg(long)]
    pub carbs: Option<f64>,

    /// Salt (g) for the whole batch. Reported only.
    #[arg(long)]
    pub salt: Option<f64>,

    /// Batch size in grams.
    #[arg(long)]
    pub total_amount: Option<f64>,
}

impl TargetArgs {
    /// Overlay the flags that were given onto `base`.
    pub fn apply(&self, base: TargetNutrition) -> TargetNutrition {
        TargetNutrition {
            calories: self.calories.unwrap_or(base.calories),
            protein: self.protein.unwrap_or(base.protein),
            fat: self.fat.unwrap_or(base.fat),
            carbs: self.carbs.unwrap_or(base.carbs),
            salt: self.salt.unwrap_or(base.salt),
            total_amount: self.total_amount.unwrap_or(base.total_amount),
        }
    }
}

/// Solver overrides. Unset fields keep the configuration's values.
#[derive(Args, Debug, Default, Clone)]
pub struct SolverArgs {
    /// Independent annealing reads.
    #[arg(long)]
    pub reads: Option<usize>,

    /// Sweeps per read.
    #[arg(long)]
    pub sweeps: Option<usize>,

    /// Random seed for reproducible results.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Overall time limit in milliseconds; the best mix found so far is used.
    #[arg(long)]
    pub time_limit_ms: Option<u64>,

    /// Binary digits per ingredient proportion.
    #[arg(long)]
    pub bits: Option<usize>,

    /// How the total-mass penalty is built.
    #[arg(long, value_enum)]
    pub penalty_mode: Option<PenaltyMode>,
}

impl SolverArgs {
    pub fn apply(&self, config: &mut OptimizerConfig) {
        if let Some(reads) = self.reads {
            config.anneal.num_reads = reads;
        }
        if let Some(sweeps) = self.sweeps {
            config.anneal.num_sweeps = sweeps;
        }
        if let Some(seed) = self.seed {
            config.anneal.seed = Some(seed);
        }
        if let Some(ms) = self.time_limit_ms {
            config.anneal.time_limit_ms = Some(ms);
        }
        if let Some(bits) = self.bits {
            config.bits_per_ingredient = bits;
        }
        if let Some(mode) = self.penalty_mode {
            config.penalty_mode = mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_optimize() {
        let cli = Cli::parse_from(["nutri-mix"]);
        assert!(cli.command.is_none());
        assert!(matches!(Command::default(), Command::Optimize { .. }));
    }

    #[test]
    fn test_target_flags_override_defaults() {
        let cli = Cli::parse_from([
            "nutri-mix",
            "optimize",
            "--calories",
            "400",
            "--total-amount",
            "200",
        ]);
        let Some(Command::Optimize { target, .. }) = cli.command else {
            panic!("expected optimize");
        };
        let t = target.apply(TargetNutrition::default());
        assert_eq!(t.calories, 400.0);
        assert_eq!(t.total_amount, 200.0);
        assert_eq!(t.protein, TargetNutrition::default().protein);
    }

    #[test]
    fn test_solver_flags_apply() {
        let cli = Cli::parse_from([
            "nutri-mix",
            "optimize",
            "--reads",
            "10",
            "--seed",
            "7",
            "--penalty-mode",
            "normalized",
        ]);
        let Some(Command::Optimize { solver, .. }) = cli.command else {
            panic!("expected optimize");
        };
        let mut config = OptimizerConfig::default();
        solver.apply(&mut config);
        assert_eq!(config.anneal.num_reads, 10);
        assert_eq!(config.anneal.seed, Some(7));
        assert_eq!(config.penalty_mode, PenaltyMode::Normalized);
        assert_eq!(config.anneal.num_sweeps, OptimizerConfig::default().anneal.num_sweeps);
    }
}
