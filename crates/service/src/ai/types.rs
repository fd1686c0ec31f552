//! Shapes of the JSON the model is asked to produce.
//!
//! Deserialization is deliberately forgiving: every field a model might
//! omit has a default, and ingredient amounts accept strings like
//! "to taste" (coerced to 1.0) alongside plain numbers.

use serde::{Deserialize, Deserializer, Serialize};

fn default_ingredient_name() -> String {
    "Ingredient".to_string()
}

/// Accepts a number, a numeric string, or free text (1.0); missing is 0.
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().unwrap_or(1.0),
        _ => 0.0,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedIngredient {
    #[serde(default = "default_ingredient_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

/// A complete recipe as generated by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedRecipe {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub prep_time: Option<i32>,
    #[serde(default)]
    pub ingredients: Vec<GeneratedIngredient>,
    #[serde(default)]
    pub nutrition: Nutrition,
    #[serde(default)]
    pub tags: String,
}

/// One meal cell of the weekly grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealSummary {
    pub name: String,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: String,
    pub breakfast: MealSummary,
    pub lunch: MealSummary,
    pub dinner: MealSummary,
}

/// Full weekly-plan payload: recipes plus the seven-day grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyPlan {
    #[serde(default)]
    pub total_calories_per_day: f64,
    #[serde(default)]
    pub recipes: Vec<GeneratedRecipe>,
    pub meal_plan: Vec<DayPlan>,
}

/// One entry of the recipe search result list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSuggestion {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
    #[serde(default)]
    pub tags: String,
}

/// Profile data that feeds the weekly-plan prompt.
#[derive(Debug, Clone)]
pub struct PlanProfile {
    pub gender: String,
    pub weight: f64,
    pub height: f64,
    pub date_of_birth: chrono::NaiveDate,
    pub dietary_preferences: String,
    pub activity_level: String,
    pub goal: String,
    pub notes: String,
}
