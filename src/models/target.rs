use serde::{Deserialize, Serialize};

use crate::optimizer::constants::DEFAULT_TOTAL_AMOUNT;

/// The four nutrients the optimizer matches. Salt is only reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nutrient {
    Calories,
    Protein,
    Fat,
    Carbs,
}

impl Nutrient {
    /// Optimized nutrients in objective order.
    pub const OPTIMIZED: [Nutrient; 4] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Fat,
        Nutrient::Carbs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Protein => "protein",
            Nutrient::Fat => "fat",
            Nutrient::Carbs => "carbs",
        }
    }
}

/// Target nutrition for a whole batch of `total_amount` grams.
///
/// Nutrient values are per batch, not per gram. A zero nutrient target drops
/// that nutrient from the objective, so nutrients missing from JSON read as 0
/// and only `total_amount` falls back to 100 g. `Default` is the full request
/// default used when no target is given at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetNutrition {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub salt: f64,
    #[serde(default = "default_total_amount")]
    pub total_amount: f64,
}

fn default_total_amount() -> f64 {
    DEFAULT_TOTAL_AMOUNT
}

impl Default for TargetNutrition {
    fn default() -> Self {
        Self {
            calories: 299.0,
            protein: 12.0,
            fat: 7.4,
            carbs: 46.4,
            salt: 0.0,
            total_amount: DEFAULT_TOTAL_AMOUNT,
        }
    }
}

impl TargetNutrition {
    /// Per-batch target of one optimized nutrient.
    #[inline]
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Fat => self.fat,
            Nutrient::Carbs => self.carbs,
        }
    }

    /// Per-gram target of one optimized nutrient.
    ///
    /// Callers must have checked `total_amount > 0`.
    #[inline]
    pub fn per_gram(&self, nutrient: Nutrient) -> f64 {
        self.get(nutrient) / self.total_amount
    }

    /// Same target scaled to a batch `factor` times larger.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            fat: self.fat * factor,
            carbs: self.carbs * factor,
            salt: self.salt * factor,
            total_amount: self.total_amount * factor,
        }
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        format!(
            "{} kcal, P:{} F:{} C:{} salt:{} per {} g",
            self.calories, self.protein, self.fat, self.carbs, self.salt, self.total_amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_request_default() {
        let target = TargetNutrition::default();
        assert_eq!(target.calories, 299.0);
        assert_eq!(target.total_amount, 100.0);
    }

    #[test]
    fn test_nutrient_names() {
        let names: Vec<&str> = Nutrient::OPTIMIZED.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["calories", "protein", "fat", "carbs"]);
    }

    #[test]
    fn test_per_gram() {
        let target = TargetNutrition {
            calories: 400.0,
            total_amount: 200.0,
            ..Default::default()
        };
        assert!((target.per_gram(Nutrient::Calories) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_scaled_keeps_per_gram() {
        let target = TargetNutrition::default();
        let doubled = target.scaled(2.0);
        for n in Nutrient::OPTIMIZED {
            assert!((target.per_gram(n) - doubled.per_gram(n)).abs() < 1e-12);
        }
        assert_eq!(doubled.total_amount, 200.0);
    }

    #[test]
    fn test_partial_json_missing_nutrients_are_zero() {
        let target: TargetNutrition = serde_json::from_str(r#"{"calories": 500}"#).unwrap();
        assert_eq!(target.calories, 500.0);
        assert_eq!(target.protein, 0.0);
        assert_eq!(target.fat, 0.0);
        assert_eq!(target.carbs, 0.0);
        assert_eq!(target.salt, 0.0);
        assert_eq!(target.total_amount, 100.0);
    }

    #[test]
    fn test_empty_json_only_sets_batch_size() {
        let target: TargetNutrition = serde_json::from_str("{}").unwrap();
        assert_eq!(target.calories, 0.0);
        assert_eq!(target.total_amount, 100.0);
        assert_ne!(target, TargetNutrition::default());
    }
}
