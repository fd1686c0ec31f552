use axum::{extract::State, Extension, Json};
use chrono::{Duration, Local, NaiveDate};
use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use models::{ingredient, meal_plan, recipe};
use service::ai::types::{DayPlan, GeneratedRecipe, PlanProfile, RecipeSuggestion};
use service::ai::matching;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;
use crate::routes::recipes::RecipeOut;

fn default_activity_level() -> String {
    "moderate".into()
}

fn default_goal() -> String {
    "maintain".into()
}

#[derive(Debug, Deserialize)]
pub struct GenerateRecipeRequest {
    pub ingredients: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct WeeklyPlanRequest {
    #[serde(default = "default_activity_level")]
    pub activity_level: String,
    #[serde(default = "default_goal")]
    pub goal: String,
    #[serde(default)]
    pub notes: String,
    /// First day of the planned week; today when absent.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRecipesRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct WeeklyPlanResponse {
    pub message: String,
    pub total_calories_per_day: f64,
    pub target_calories: i64,
    pub meal_plan: Vec<DayPlan>,
    pub recipes_created: usize,
    pub meal_plans_created: usize,
}

#[derive(Debug, Serialize)]
pub struct SearchRecipesResponse {
    pub message: String,
    pub suggestions: Vec<RecipeSuggestion>,
}

fn to_recipe_input(generated: &GeneratedRecipe) -> recipe::RecipeInput {
    recipe::RecipeInput {
        name: generated.name.clone(),
        description: Some(generated.description.clone()),
        instructions: Some(generated.instructions.clone()),
        image_url: None,
        servings: generated.servings.unwrap_or(1),
        prep_time: generated.prep_time,
        calories: Some(generated.nutrition.calories),
        protein: Some(generated.nutrition.protein),
        carbs: Some(generated.nutrition.carbs),
        fat: Some(generated.nutrition.fat),
        tags: Some(generated.tags.clone()),
    }
}

fn to_ingredient_inputs(generated: &GeneratedRecipe) -> Vec<ingredient::IngredientInput> {
    generated
        .ingredients
        .iter()
        .map(|i| ingredient::IngredientInput {
            name: i.name.clone(),
            amount: i.amount,
            unit: i.unit.clone(),
        })
        .collect()
}

#[utoipa::path(post, path = "/ai/generate-recipe", tag = "ai", request_body = crate::openapi::GenerateRecipeRequestDoc, responses((status = 200, description = "Recipe generated and saved"), (status = 400, description = "Empty ingredient list"), (status = 500, description = "Model failure")))]
pub async fn generate_recipe(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<GenerateRecipeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let prefs = user.dietary_preferences.clone().unwrap_or_default();
    let generated = state.ai.generate_recipe(&payload.ingredients, &prefs).await?;

    let txn = state.db.begin().await?;
    let created = recipe::create(&txn, Some(user.id), to_recipe_input(&generated)).await?;
    ingredient::create_for_recipe(&txn, created.id, to_ingredient_inputs(&generated)).await?;
    txn.commit().await?;

    let ingredients = ingredient::list_for_recipe(&state.db, created.id).await?;
    Ok(Json(serde_json::json!({
        "message": "recipe generated and saved",
        "recipe": RecipeOut { recipe: created, ingredients },
    })))
}

#[utoipa::path(post, path = "/ai/suggest-weekly-plan", tag = "ai", request_body = crate::openapi::WeeklyPlanRequestDoc, responses((status = 200, description = "Week planned and persisted"), (status = 400, description = "Profile incomplete"), (status = 500, description = "Model failure")))]
pub async fn suggest_weekly_plan(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<WeeklyPlanRequest>,
) -> Result<Json<WeeklyPlanResponse>, ApiError> {
    let (date_of_birth, weight, height) = match (user.date_of_birth, user.weight, user.height) {
        (Some(d), Some(w), Some(h)) => (d, w, h),
        _ => {
            return Err(ApiError::BadRequest(
                "profile must include date of birth, weight and height".into(),
            ))
        }
    };

    let profile = PlanProfile {
        gender: user.gender.clone().unwrap_or_default(),
        weight,
        height,
        date_of_birth,
        dietary_preferences: user.dietary_preferences.clone().unwrap_or_default(),
        activity_level: payload.activity_level,
        goal: payload.goal,
        notes: payload.notes,
    };
    let today = Local::now().date_naive();
    let (targets, plan) = state.ai.suggest_weekly_plan(&profile, today).await?;

    let start = payload.start_date.unwrap_or(today);
    let end = start + Duration::days(6);

    let txn = state.db.begin().await?;

    // Persist every generated recipe first; the plan grid refers to
    // them by name.
    let mut saved: Vec<(String, Uuid)> = Vec::with_capacity(plan.recipes.len());
    for generated in &plan.recipes {
        let created = recipe::create(&txn, Some(user.id), to_recipe_input(generated)).await?;
        ingredient::create_for_recipe(&txn, created.id, to_ingredient_inputs(generated)).await?;
        saved.push((generated.name.clone(), created.id));
    }

    let removed = meal_plan::delete_range(&txn, user.id, start, end).await?;
    if removed > 0 {
        info!(removed, %start, %end, "cleared existing plans for the week");
    }

    let mut created_plans = 0usize;
    for (day_index, day) in plan.meal_plan.iter().enumerate() {
        let date = start + Duration::days(day_index as i64);
        for (meal_type, meal) in [
            ("Breakfast", &day.breakfast),
            ("Lunch", &day.lunch),
            ("Dinner", &day.dinner),
        ] {
            let recipe_id = matching::resolve(&meal.name, &saved).ok_or_else(|| {
                warn!(meal = %meal.name, "plan names a recipe the model never produced");
                ApiError::Internal(format!("no generated recipe matches '{}'", meal.name))
            })?;
            meal_plan::create(&txn, user.id, recipe_id, date, meal_type, 1).await?;
            created_plans += 1;
        }
    }

    txn.commit().await?;
    info!(
        recipes = saved.len(),
        plans = created_plans,
        "weekly plan persisted"
    );

    Ok(Json(WeeklyPlanResponse {
        message: "weekly plan generated and saved".into(),
        total_calories_per_day: plan.total_calories_per_day,
        target_calories: targets.target_calories,
        meal_plan: plan.meal_plan,
        recipes_created: saved.len(),
        meal_plans_created: created_plans,
    }))
}

#[utoipa::path(post, path = "/ai/search-recipes", tag = "ai", request_body = crate::openapi::SearchRecipesRequestDoc, responses((status = 200, description = "Suggestions"), (status = 400, description = "Empty query"), (status = 500, description = "Model failure")))]
pub async fn search_recipes(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<SearchRecipesRequest>,
) -> Result<Json<SearchRecipesResponse>, ApiError> {
    let prefs = user.dietary_preferences.clone().unwrap_or_default();
    let suggestions = state.ai.search_recipes(&payload.query, &prefs).await?;
    Ok(Json(SearchRecipesResponse {
        message: format!("found {} matching dishes", suggestions.len()),
        suggestions,
    }))
}
