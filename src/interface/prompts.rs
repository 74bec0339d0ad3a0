use dialoguer::{Confirm, Input, Select};

use crate::error::{MixError, Result};
use crate::models::TargetNutrition;
use crate::optimizer::PenaltyMode;

/// Prompt for a non-negative amount.
pub fn prompt_amount(prompt: &str, default: f64) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| MixError::InvalidInput(format!("Invalid number: {}", input)))?;

    if !value.is_finite() || value < 0.0 {
        return Err(MixError::InvalidInput(format!(
            "{} must be a non-negative number",
            prompt
        )));
    }

    Ok(value)
}

/// Prompt for every field of the target, starting from `defaults`.
pub fn prompt_target_nutrition(defaults: &TargetNutrition) -> Result<TargetNutrition> {
    let total_amount = prompt_amount("Batch size in grams", defaults.total_amount)?;
    if total_amount <= 0.0 {
        return Err(MixError::InvalidInput(
            "Batch size must be greater than zero".to_string(),
        ));
    }

    println!("Enter target nutrition for the whole {} g batch.", total_amount);
    println!("A target of 0 leaves that nutrient out of the optimization.");

    Ok(TargetNutrition {
        calories: prompt_amount("Calories (kcal)", defaults.calories)?,
        protein: prompt_amount("Protein (g)", defaults.protein)?,
        fat: prompt_amount("Fat (g)", defaults.fat)?,
        carbs: prompt_amount("Carbohydrates (g)", defaults.carbs)?,
        salt: prompt_amount("Salt (g)", defaults.salt)?,
        total_amount,
    })
}

/// Prompt for how the total-mass term is built.
pub fn prompt_penalty_mode(default: PenaltyMode) -> Result<PenaltyMode> {
    let options = [
        "literal    - penalize total mass, renormalize afterwards",
        "normalized - pull total mass toward exactly 100%",
    ];
    let selection = Select::new()
        .with_prompt("Total-mass penalty")
        .items(&options)
        .default(match default {
            PenaltyMode::Literal => 0,
            PenaltyMode::Normalized => 1,
        })
        .interact()?;

    Ok(match selection {
        1 => PenaltyMode::Normalized,
        _ => PenaltyMode::Literal,
    })
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
