use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{
    AnalysisResponse, Ingredient, IngredientList, NutritionPer100g, ProportionResult,
    TargetNutrition,
};
use crate::optimizer::OptimizerConfig;

/// One row of an ingredient CSV file.
#[derive(Debug, Deserialize)]
struct IngredientRow {
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    calories: f64,
    #[serde(default)]
    protein: f64,
    #[serde(default)]
    fat: f64,
    #[serde(default)]
    carbs: f64,
    #[serde(default)]
    salt: f64,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Ingredient {
            name: row.name,
            category: row.category,
            nutrition_per_100g: NutritionPer100g {
                calories: row.calories,
                protein: row.protein,
                fat: row.fat,
                carbs: row.carbs,
                salt: row.salt,
            },
        }
    }
}

/// Load ingredients from a JSON or CSV file.
///
/// Files ending in `.csv` are read as `name,category,calories,protein,fat,carbs,salt`
/// rows; anything else is parsed as JSON (envelope or bare array). Order is kept.
pub fn load_ingredients<P: AsRef<Path>>(path: P) -> Result<IngredientList> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
        let mut ingredients = Vec::new();
        for row in rdr.deserialize::<IngredientRow>() {
            ingredients.push(row?.into());
        }
        return Ok(IngredientList::new(ingredients));
    }

    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load a target; missing nutrients are 0 and a missing `total_amount` is 100 g.
pub fn load_target<P: AsRef<Path>>(path: P) -> Result<TargetNutrition> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load an optimizer configuration; missing fields take their defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<OptimizerConfig> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &OptimizerConfig) -> Result<()> {
    write_json(path, config)
}

/// Save the full response as pretty JSON.
pub fn save_response<P: AsRef<Path>>(path: P, response: &AnalysisResponse) -> Result<()> {
    write_json(path, response)
}

/// Write `name,percent` rows in ingredient order.
pub fn write_proportions_csv<P: AsRef<Path>>(
    path: P,
    proportions: &ProportionResult,
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["name", "percent"])?;
    for (name, percent) in proportions.iter() {
        wtr.write_record([name.to_string(), format!("{:.4}", percent)])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn test_load_json_envelope() {
        let json = r#"{"ingredients": [
            {"name": "Soy flour", "category": "beans", "estimated_nutrition": {"calories": 400, "protein": 35, "fat": 20, "carbs": 30, "salt": 0}},
            {"name": "Syrup", "category": "sugar", "estimated_nutrition": {"calories": 300, "carbs": 75}}
        ]}"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let list = load_ingredients(file.path()).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.ingredients[0].name, "Soy flour");
        assert_eq!(list.ingredients[1].nutrition_per_100g.carbs, 75.0);
        assert_eq!(list.ingredients[1].nutrition_per_100g.protein, 0.0);
    }

    #[test]
    fn test_load_csv_keeps_order() {
        let csv = "name,category,calories,protein,fat,carbs,salt\n\
                   Oats, grain, 380, 13, 7, 60, 0\n\
                   Honey, sugar, 300, 0, 0, 80, 0\n";

        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(csv.as_bytes()).unwrap();

        let list = load_ingredients(file.path()).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.ingredients[0].name, "Oats");
        assert_eq!(list.ingredients[0].category, "grain");
        assert_eq!(list.ingredients[1].nutrition_per_100g.carbs, 80.0);
    }

    #[test]
    fn test_load_target_partial() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"calories": 500, "total_amount": 250}"#).unwrap();

        let target = load_target(file.path()).unwrap();
        assert_eq!(target.calories, 500.0);
        assert_eq!(target.total_amount, 250.0);
        assert_eq!(target.protein, 0.0);
        assert_eq!(target.fat, 0.0);
        assert_eq!(target.carbs, 0.0);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = OptimizerConfig::default();
        config.anneal.num_reads = 7;
        config.anneal.seed = Some(42);

        let file = NamedTempFile::new().unwrap();
        save_config(file.path(), &config).unwrap();
        let loaded = load_config(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_write_proportions_csv() {
        let mut proportions = ProportionResult::new();
        proportions.insert("Oats", 62.5);
        proportions.insert("Honey", 37.5);

        let file = NamedTempFile::new().unwrap();
        write_proportions_csv(file.path(), &proportions).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "name,percent\nOats,62.5000\nHoney,37.5000\n");
    }
}
