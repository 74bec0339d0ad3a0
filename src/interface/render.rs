use crate::models::{Ingredient, NutrientProfile, TargetNutrition};
use crate::optimizer::{Optimization, QuboSummary};

/// Display the recommended mix and its nutrition next to the target.
pub fn display_optimization(optimization: &Optimization, target: &TargetNutrition) {
    let result = &optimization.result;

    println!();
    println!("=== Recommended Mix ===");
    println!();

    let max_name_len = result
        .proportions
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(10);

    for (i, (name, percent)) in result.proportions.iter().enumerate() {
        let grams = percent / 100.0 * target.total_amount;
        println!(
            "{:>3}. {:<width$} {:>7.2}%  ({:.1} g)",
            i + 1,
            name,
            percent,
            grams,
            width = max_name_len
        );
    }

    println!();
    println!("--- Nutrition per {} g ---", target.total_amount);
    println!("{:<10} {:>10} {:>10} {:>9}", "", "mix", "target", "diff");

    let total = &result.calculated_nutrition.total;
    print_row("calories", total.calories, target.calories);
    print_row("protein", total.protein, target.protein);
    print_row("fat", total.fat, target.fat);
    print_row("carbs", total.carbs, target.carbs);
    print_row("salt", total.salt, target.salt);

    println!();
    println!("--- Solver ---");
    println!("Variables: {}", optimization.num_variables);
    println!("Energy: {:.6}", optimization.energy);
    println!(
        "Reads: {} ({} sweeps, {:.2?}){}",
        optimization.stats.reads,
        optimization.stats.total_sweeps,
        optimization.stats.elapsed,
        if optimization.stats.timed_out {
            " [time limit hit]"
        } else {
            ""
        }
    );
    println!("Seed: {}", optimization.stats.seed);
    println!("Residual (rms relative): {:.4}", optimization.residual.rms);
    for (nutrient, deviation) in &optimization.residual.per_nutrient {
        println!("  {:<10} {:+.2}%", nutrient.name(), deviation * 100.0);
    }
    println!();
}

fn print_row(label: &str, actual: f64, target: f64) {
    let diff = if target > 0.0 {
        format!("{:+.1}%", (actual - target) / target * 100.0)
    } else {
        "-".to_string()
    };
    println!("{:<10} {:>10.2} {:>10.2} {:>9}", label, actual, target, diff);
}

/// Display a per-gram profile on one line.
pub fn display_profile(title: &str, profile: &NutrientProfile) {
    println!(
        "{}: {:.3} kcal, P:{:.3} F:{:.3} C:{:.3} salt:{:.3}",
        title, profile.calories, profile.protein, profile.fat, profile.carbs, profile.salt
    );
}

/// Display the ingredients that will be blended.
pub fn display_ingredient_list(ingredients: &[Ingredient], title: &str) {
    if ingredients.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} items) ===", title, ingredients.len());
    println!();

    for ingredient in ingredients {
        println!("  {}", ingredient.debug_string());
    }

    println!();
}

/// Display the size and coefficient range of an objective.
pub fn display_objective_summary(summary: &QuboSummary, bits_per_ingredient: usize) {
    println!();
    println!("=== Objective ===");
    println!();
    println!(
        "Variables: {} ({} bits per ingredient)",
        summary.num_variables, bits_per_ingredient
    );
    println!("Interactions: {}", summary.num_interactions);
    println!(
        "Coefficients: {:.6e} .. {:.6e}",
        summary.min_coefficient, summary.max_coefficient
    );
    println!("Constant offset: {:.6}", summary.offset);
    println!();
}
