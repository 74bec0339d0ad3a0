use std::path::Path;

use clap::Parser;

use nutri_mix_rs::cli::{Cli, Command, SolverArgs, TargetArgs};
use nutri_mix_rs::error::{MixError, Result};
use nutri_mix_rs::interface::{
    display_ingredient_list, display_objective_summary, display_optimization, display_profile,
    prompt_penalty_mode, prompt_target_nutrition, prompt_yes_no,
};
use nutri_mix_rs::models::TargetNutrition;
use nutri_mix_rs::optimizer::{build_objective, optimize_mix, OptimizerConfig};
use nutri_mix_rs::state::{
    load_config, load_ingredients, load_target, save_response, write_proportions_csv,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.unwrap_or_default();
    let base_config = match &cli.config {
        Some(path) => load_config(path)?,
        None => OptimizerConfig::default(),
    };

    match command {
        Command::Optimize {
            target,
            solver,
            interactive,
            output,
            csv,
        } => cmd_optimize(
            &cli.ingredients,
            base_config,
            &target,
            &solver,
            interactive,
            output.as_deref(),
            csv.as_deref(),
        ),
        Command::Objective { target, solver } => {
            cmd_objective(&cli.ingredients, base_config, &target, &solver)
        }
    }
}

fn resolve_target(args: &TargetArgs) -> Result<TargetNutrition> {
    let base = match &args.target {
        Some(path) => load_target(path)?,
        None => TargetNutrition::default(),
    };
    Ok(args.apply(base))
}

/// Optimize proportions and report the mix.
fn cmd_optimize(
    ingredients_path: &Path,
    mut config: OptimizerConfig,
    target_args: &TargetArgs,
    solver_args: &SolverArgs,
    interactive: bool,
    output: Option<&Path>,
    csv: Option<&Path>,
) -> Result<()> {
    if !ingredients_path.exists() {
        eprintln!("Ingredient file not found: {}", ingredients_path.display());
        eprintln!("Pass --ingredients with the extraction service's JSON or a CSV file.");
        return Ok(());
    }

    let list = load_ingredients(ingredients_path)?;
    println!("Loaded {} ingredients", list.len());
    display_ingredient_list(&list.ingredients, "Ingredients");

    let mut target = resolve_target(target_args)?;
    solver_args.apply(&mut config);

    if interactive {
        target = prompt_target_nutrition(&target)?;
        config.penalty_mode = prompt_penalty_mode(config.penalty_mode)?;
    }

    println!(
        "Optimizing for {:.1} kcal, P:{:.1} F:{:.1} C:{:.1} per {} g...",
        target.calories, target.protein, target.fat, target.carbs, target.total_amount
    );

    let optimization = match optimize_mix(&list.ingredients, &target, &config) {
        Ok(o) => o,
        Err(MixError::DegenerateResult) => {
            eprintln!("No feasible mix: the solver left every ingredient at 0%.");
            eprintln!("Try more reads or sweeps, or --penalty-mode normalized.");
            return Err(MixError::DegenerateResult);
        }
        Err(e) => return Err(e),
    };

    display_optimization(&optimization, &target);

    if let Some(path) = csv {
        write_proportions_csv(path, &optimization.result.proportions)?;
        println!("Wrote proportions to {}", path.display());
    }

    let response = optimization.into_response(list);

    let output = match output {
        Some(path) => Some(path.to_path_buf()),
        None if interactive
            && prompt_yes_no("Save result to optimization_result.json?", false)? =>
        {
            Some("optimization_result.json".into())
        }
        None => None,
    };

    if let Some(path) = output {
        save_response(&path, &response)?;
        println!("Result saved to {}", path.display());
    }

    Ok(())
}

/// Build the objective and print its size.
fn cmd_objective(
    ingredients_path: &Path,
    mut config: OptimizerConfig,
    target_args: &TargetArgs,
    solver_args: &SolverArgs,
) -> Result<()> {
    let list = load_ingredients(ingredients_path)?;
    let target = resolve_target(target_args)?;
    solver_args.apply(&mut config);

    let (problem, qubo) = build_objective(&list.ingredients, &target, &config)?;

    display_profile("Target per gram", &problem.target_per_gram);
    for ingredient in &problem.ingredients {
        println!(
            "  {}: normalized [{:.3}, {:.3}, {:.3}, {:.3}]",
            ingredient.name,
            ingredient.normalized[0],
            ingredient.normalized[1],
            ingredient.normalized[2],
            ingredient.normalized[3]
        );
    }
    display_objective_summary(&qubo.summary(), config.bits_per_ingredient);

    Ok(())
}
