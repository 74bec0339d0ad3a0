use serde::{Deserialize, Serialize};

use crate::error::{MixError, Result};
use crate::models::{Ingredient, Nutrient, NutrientProfile, TargetNutrition};
use crate::optimizer::constants::*;
use crate::optimizer::encoding::{BitVariable, FixedPoint};
use crate::optimizer::qubo::Qubo;

/// How the total-mass term is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyMode {
    /// `F·(Σx)²`: only discourages a large total. Renormalization after
    /// solving restores the 100% sum.
    #[default]
    Literal,
    /// `F·(Σx − 1)²`: pulls the encoded total toward exactly 1.
    Normalized,
}

/// How the linear part of each nutrient term is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LinearTerm {
    /// `−2·offset·c_i·w_j`, the exact expansion of `(Σ c_i·x_i − offset)²`.
    #[default]
    Exact,
    /// `−2·offset·c_i·w_j²`. Shrinks every linear term by its digit weight,
    /// which leaves all coefficients positive for non-negative inputs and
    /// drives the solver to the all-zero mix.
    BitWeighted,
}

/// Weights of the five penalty terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyWeights {
    pub magnitude: f64,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            magnitude: MAGNITUDE_PENALTY_WEIGHT,
            calories: CALORIES_PENALTY_WEIGHT,
            protein: PROTEIN_PENALTY_WEIGHT,
            fat: FAT_PENALTY_WEIGHT,
            carbs: CARBS_PENALTY_WEIGHT,
        }
    }
}

impl PenaltyWeights {
    #[inline]
    pub fn nutrient(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Fat => self.fat,
            Nutrient::Carbs => self.carbs,
        }
    }
}

/// One ingredient's nutrition per gram and relative to the per-gram target.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedIngredient {
    pub name: String,
    pub per_gram: NutrientProfile,
    /// Per-gram value over per-gram target, or 0 when the target is 0.
    /// Indexed like `Nutrient::OPTIMIZED`.
    pub normalized: [f64; 4],
}

impl NormalizedIngredient {
    #[inline]
    pub fn norm(&self, nutrient: Nutrient) -> f64 {
        self.normalized[nutrient_slot(nutrient)]
    }
}

/// Ingredients and target reduced to per-gram, target-relative form.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedProblem {
    pub ingredients: Vec<NormalizedIngredient>,
    pub target_per_gram: NutrientProfile,
    pub total_amount: f64,
}

impl NormalizedProblem {
    /// Fails with `InvalidInput` unless `total_amount` is positive and finite.
    pub fn new(ingredients: &[Ingredient], target: &TargetNutrition) -> Result<Self> {
        if !(target.total_amount.is_finite() && target.total_amount > 0.0) {
            return Err(MixError::InvalidInput(format!(
                "total_amount must be positive, got {}",
                target.total_amount
            )));
        }

        let target_per_gram = NutrientProfile {
            calories: target.per_gram(Nutrient::Calories),
            protein: target.per_gram(Nutrient::Protein),
            fat: target.per_gram(Nutrient::Fat),
            carbs: target.per_gram(Nutrient::Carbs),
            salt: target.salt / target.total_amount,
        };

        let ingredients = ingredients
            .iter()
            .map(|ingredient| {
                let n = &ingredient.nutrition_per_100g;
                let per_gram = NutrientProfile {
                    calories: n.calories / GRAMS_PER_QUOTE,
                    protein: n.protein / GRAMS_PER_QUOTE,
                    fat: n.fat / GRAMS_PER_QUOTE,
                    carbs: n.carbs / GRAMS_PER_QUOTE,
                    salt: n.salt / GRAMS_PER_QUOTE,
                };
                let normalized = Nutrient::OPTIMIZED.map(|nutrient| {
                    let target_g = target_per_gram.get(nutrient);
                    if target_g > 0.0 {
                        per_gram.get(nutrient) / target_g
                    } else {
                        0.0
                    }
                });
                NormalizedIngredient {
                    name: ingredient.name.clone(),
                    per_gram,
                    normalized,
                }
            })
            .collect();

        Ok(Self {
            ingredients,
            target_per_gram,
            total_amount: target.total_amount,
        })
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }
}

#[inline]
fn nutrient_slot(nutrient: Nutrient) -> usize {
    match nutrient {
        Nutrient::Calories => 0,
        Nutrient::Protein => 1,
        Nutrient::Fat => 2,
        Nutrient::Carbs => 3,
    }
}

/// Assembles the QUBO for a normalized problem.
pub struct ObjectiveBuilder<'a> {
    problem: &'a NormalizedProblem,
    encoding: &'a FixedPoint,
    weights: PenaltyWeights,
    penalty_mode: PenaltyMode,
    linear_term: LinearTerm,
}

impl<'a> ObjectiveBuilder<'a> {
    pub fn new(problem: &'a NormalizedProblem, encoding: &'a FixedPoint) -> Self {
        Self {
            problem,
            encoding,
            weights: PenaltyWeights::default(),
            penalty_mode: PenaltyMode::default(),
            linear_term: LinearTerm::default(),
        }
    }

    pub fn weights(mut self, weights: PenaltyWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn penalty_mode(mut self, mode: PenaltyMode) -> Self {
        self.penalty_mode = mode;
        self
    }

    pub fn linear_term(mut self, linear_term: LinearTerm) -> Self {
        self.linear_term = linear_term;
        self
    }

    pub fn build(&self) -> Qubo {
        let num_variables = self.problem.len() * self.encoding.bits();
        let mut qubo = Qubo::new(num_variables);
        if num_variables == 0 {
            return qubo;
        }

        // Total-mass term: c_i = 1 for every ingredient.
        let ones = vec![1.0; self.problem.len()];
        let magnitude_offset = match self.penalty_mode {
            PenaltyMode::Literal => 0.0,
            PenaltyMode::Normalized => 1.0,
        };
        self.add_squared_penalty(&mut qubo, &ones, self.weights.magnitude, magnitude_offset);

        for nutrient in Nutrient::OPTIMIZED {
            let coefficients: Vec<f64> = self
                .problem
                .ingredients
                .iter()
                .map(|ing| ing.norm(nutrient))
                .collect();
            let weight = self.weights.nutrient(nutrient);
            self.add_squared_penalty(&mut qubo, &coefficients, weight, 1.0);
        }

        qubo
    }

    /// Expand `weight·(Σ_i c_i·x_i − offset)²` with `x_i = Σ_j w_j·q_ij`.
    fn add_squared_penalty(&self, qubo: &mut Qubo, c: &[f64], weight: f64, offset: f64) {
        if weight == 0.0 {
            return;
        }

        let k = self.encoding.bits();
        for i in 0..c.len() {
            for j in 0..k {
                let w_j = self.encoding.weight(j);
                let q_ij = BitVariable::new(i, j).index(k);

                let scaled = c[i] * w_j;
                let linear = match self.linear_term {
                    LinearTerm::Exact => 2.0 * offset * c[i] * w_j,
                    LinearTerm::BitWeighted => 2.0 * offset * c[i] * w_j * w_j,
                };
                qubo.add_linear(q_ij, weight * (scaled * scaled - linear));

                for kk in (j + 1)..k {
                    let w_k = self.encoding.weight(kk);
                    let q_ik = BitVariable::new(i, kk).index(k);
                    qubo.add_interaction(q_ij, q_ik, 2.0 * weight * c[i] * c[i] * w_j * w_k);
                }

                for m in (i + 1)..c.len() {
                    for n in 0..k {
                        let w_n = self.encoding.weight(n);
                        let q_mn = BitVariable::new(m, n).index(k);
                        qubo.add_interaction(q_ij, q_mn, 2.0 * weight * c[i] * c[m] * w_j * w_n);
                    }
                }
            }
        }

        qubo.add_offset(weight * offset * offset);
    }
}

/// Sum of the four nutrient penalties at proportions `x` (fractions, not percent).
pub fn nutrient_penalty(problem: &NormalizedProblem, weights: &PenaltyWeights, x: &[f64]) -> f64 {
    Nutrient::OPTIMIZED
        .iter()
        .map(|&nutrient| {
            let mixed: f64 = problem
                .ingredients
                .iter()
                .zip(x)
                .map(|(ing, xi)| ing.norm(nutrient) * xi)
                .sum();
            weights.nutrient(nutrient) * (mixed - 1.0).powi(2)
        })
        .sum()
}
