use serde::de;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::models::target::Nutrient;

/// Nutrition values per 100 g of an ingredient.
///
/// Missing fields default to 0, since the extraction service may omit a
/// nutrient it could not estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionPer100g {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub salt: f64,
}

impl NutritionPer100g {
    /// Value of one of the optimized nutrients.
    #[inline]
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Fat => self.fat,
            Nutrient::Carbs => self.carbs,
        }
    }

    /// All five values, in field order.
    pub fn values(&self) -> [f64; 5] {
        [self.calories, self.protein, self.fat, self.carbs, self.salt]
    }

    /// Non-negative and finite in every field.
    pub fn is_valid(&self) -> bool {
        self.values().iter().all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// An ingredient as supplied by the extraction service.
///
/// The nutrition object is read from either `nutrition_per_100g` or the
/// service's own `estimated_nutrition` field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,

    #[serde(default)]
    pub category: String,

    #[serde(alias = "estimated_nutrition", default)]
    pub nutrition_per_100g: NutritionPer100g,
}

impl Ingredient {
    pub fn new(name: &str, category: &str, nutrition_per_100g: NutritionPer100g) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            nutrition_per_100g,
        }
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        let n = &self.nutrition_per_100g;
        format!(
            "{} [{}]: {} kcal, P:{} F:{} C:{} salt:{} per 100g",
            self.name, self.category, n.calories, n.protein, n.fat, n.carbs, n.salt
        )
    }
}

/// Ordered ingredient list, in the envelope the extraction service emits.
///
/// Order is the label's usage-rank order; the optimizer only uses it for
/// indexing. A list parsed from JSON keeps the document it came from and
/// serializes back to it unchanged, so responses echo the caller's input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngredientList {
    pub ingredients: Vec<Ingredient>,
    source: Option<Value>,
}

impl IngredientList {
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        Self {
            ingredients,
            source: None,
        }
    }

    /// The JSON document this list was parsed from, if any.
    pub fn source(&self) -> Option<&Value> {
        self.source.as_ref()
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }
}

impl<'de> Deserialize<'de> for IngredientList {
    /// Accepts both `{"ingredients": [...]}` and a bare `[...]`.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Bare(Vec<Ingredient>),
            Envelope {
                #[serde(default)]
                ingredients: Vec<Ingredient>,
            },
        }

        let source = Value::deserialize(deserializer)?;
        let ingredients = match Shape::deserialize(&source).map_err(de::Error::custom)? {
            Shape::Bare(ingredients) => ingredients,
            Shape::Envelope { ingredients } => ingredients,
        };
        Ok(Self {
            ingredients,
            source: Some(source),
        })
    }
}

impl Serialize for IngredientList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(source) = &self.source {
            return source.serialize(serializer);
        }
        let mut envelope = serializer.serialize_struct("IngredientList", 1)?;
        envelope.serialize_field("ingredients", &self.ingredients)?;
        envelope.end()
    }
}
