use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::models::ingredient::IngredientList;
use crate::models::target::Nutrient;

/// Nutrient amounts, either per gram or per batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NutrientProfile {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub salt: f64,
}

impl NutrientProfile {
    #[inline]
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Fat => self.fat,
            Nutrient::Carbs => self.carbs,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, nutrient: Nutrient) -> &mut f64 {
        match nutrient {
            Nutrient::Calories => &mut self.calories,
            Nutrient::Protein => &mut self.protein,
            Nutrient::Fat => &mut self.fat,
            Nutrient::Carbs => &mut self.carbs,
        }
    }

    /// Every field multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            fat: self.fat * factor,
            carbs: self.carbs * factor,
            salt: self.salt * factor,
        }
    }
}

/// Nutrition of the recommended mix.
///
/// `total` is always `per_gram` times the batch's `total_amount`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NutritionReport {
    pub per_gram: NutrientProfile,
    pub total: NutrientProfile,
}

/// Ingredient name to percentage of the mix, in ingredient order.
///
/// Serialized as a JSON object. Inserting a name twice adds to the existing
/// entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProportionResult {
    entries: Vec<(String, f64)>,
}

impl ProportionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, percent: f64) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing += percent,
            None => self.entries.push((name.to_string(), percent)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), *p))
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().fold(0.0, |acc, (_, p)| acc + p)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ProportionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, percent) in &self.entries {
            map.serialize_entry(name, percent)?;
        }
        map.end()
    }
}

/// Proportions plus the nutrition they produce.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub proportions: ProportionResult,
    pub calculated_nutrition: NutritionReport,
}

/// Response handed back to the request layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResponse {
    pub ingredients: IngredientList,
    pub optimization_result: OptimizationResult,
}
