use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub dietary_preferences: Option<String>,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct ProfileUpdateRequest {
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub dietary_preferences: Option<String>,
}

#[derive(ToSchema)]
pub struct IngredientDoc {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

#[derive(ToSchema)]
pub struct RecipeRequest {
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
    pub servings: i32,
    pub prep_time: Option<i32>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub tags: Option<String>,
    pub ingredients: Vec<IngredientDoc>,
}

#[derive(ToSchema)]
pub struct RatingRequest {
    pub stars: i32,
    pub comment: Option<String>,
}

#[derive(ToSchema)]
pub struct PlanRequest {
    pub date: chrono::NaiveDate,
    pub meal_type: String,
    pub recipe_id: Uuid,
    pub servings: i32,
}

#[derive(ToSchema)]
pub struct GenerateRecipeRequestDoc {
    pub ingredients: Vec<String>,
}

#[derive(ToSchema)]
pub struct WeeklyPlanRequestDoc {
    pub activity_level: String,
    pub goal: String,
    pub notes: String,
    pub start_date: Option<chrono::NaiveDate>,
}

#[derive(ToSchema)]
pub struct SearchRecipesRequestDoc {
    pub query: String,
}

#[derive(ToSchema)]
pub struct AdminUserUpdateRequest {
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::auth::update_profile,
        crate::routes::recipes::list,
        crate::routes::recipes::list_rated,
        crate::routes::recipes::get_one,
        crate::routes::recipes::create,
        crate::routes::recipes::update,
        crate::routes::recipes::delete,
        crate::routes::recipes::rate,
        crate::routes::recipes::list_ratings,
        crate::routes::recipes::my_rating,
        crate::routes::recipes::delete_my_rating,
        crate::routes::plans::list,
        crate::routes::plans::create,
        crate::routes::plans::update,
        crate::routes::plans::delete,
        crate::routes::shopping::list,
        crate::routes::ai::generate_recipe,
        crate::routes::ai::suggest_weekly_plan,
        crate::routes::ai::search_recipes,
        crate::routes::admin::stats,
        crate::routes::admin::list_users,
        crate::routes::admin::get_user,
        crate::routes::admin::update_user,
        crate::routes::admin::delete_user,
        crate::routes::admin::list_recipes,
        crate::routes::admin::delete_recipe,
        crate::routes::admin::list_meal_plans,
        crate::routes::admin::delete_meal_plan,
        crate::routes::admin::list_ratings,
        crate::routes::admin::delete_rating,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ProfileUpdateRequest,
            IngredientDoc,
            RecipeRequest,
            RatingRequest,
            PlanRequest,
            GenerateRecipeRequestDoc,
            WeeklyPlanRequestDoc,
            SearchRecipesRequestDoc,
            AdminUserUpdateRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "recipes"),
        (name = "ratings"),
        (name = "plans"),
        (name = "shopping"),
        (name = "ai"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
