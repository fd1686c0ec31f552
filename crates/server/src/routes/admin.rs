use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::pagination::ListQuery;
use models::{meal_plan, rating, recipe, user};

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

const MAX_PAGE: u64 = 500;

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub total_users: u64,
    pub total_recipes: u64,
    pub total_meal_plans: u64,
    pub total_ratings: u64,
    pub active_users: u64,
    pub admin_users: u64,
}

#[derive(Debug, Deserialize)]
pub struct UserUpdatePayload {
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[utoipa::path(get, path = "/admin/stats", tag = "admin", responses((status = 200, description = "Aggregate counters"), (status = 403, description = "Admin only")))]
pub async fn stats(State(state): State<ServerState>) -> Result<Json<AdminStats>, ApiError> {
    let db = &state.db;
    let stats = AdminStats {
        total_users: user::Entity::find().count(db).await?,
        total_recipes: recipe::Entity::find().count(db).await?,
        total_meal_plans: meal_plan::Entity::find().count(db).await?,
        total_ratings: rating::Entity::find().count(db).await?,
        active_users: user::Entity::find()
            .filter(user::Column::IsActive.eq(true))
            .count(db)
            .await?,
        admin_users: user::Entity::find()
            .filter(user::Column::Role.eq(user::ROLE_ADMIN))
            .count(db)
            .await?,
    };
    Ok(Json(stats))
}

#[utoipa::path(get, path = "/admin/users", tag = "admin", responses((status = 200, description = "All accounts"), (status = 403, description = "Admin only")))]
pub async fn list_users(
    State(state): State<ServerState>,
    Query(page): Query<ListQuery>,
) -> Result<Json<Vec<user::Model>>, ApiError> {
    let page = page.clamped(MAX_PAGE);
    Ok(Json(user::list(&state.db, page.skip, page.limit).await?))
}

#[utoipa::path(get, path = "/admin/users/{id}", tag = "admin", responses((status = 200, description = "Account detail"), (status = 404, description = "Not found")))]
pub async fn get_user(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<user::Model>, ApiError> {
    let found = user::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
    Ok(Json(found))
}

#[utoipa::path(put, path = "/admin/users/{id}", tag = "admin", request_body = crate::openapi::AdminUserUpdateRequest, responses((status = 200, description = "Account updated"), (status = 400, description = "Invalid role"), (status = 404, description = "Not found")))]
pub async fn update_user(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserUpdatePayload>,
) -> Result<Json<user::Model>, ApiError> {
    use sea_orm::{ActiveModelTrait, Set};

    let found = user::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    let mut am: user::ActiveModel = found.into();
    if let Some(role) = payload.role {
        if role != user::ROLE_USER && role != user::ROLE_ADMIN {
            return Err(ApiError::BadRequest("role must be user or admin".into()));
        }
        am.role = Set(role);
    }
    if let Some(active) = payload.is_active {
        am.is_active = Set(active);
    }
    am.updated_at = Set(chrono::Utc::now().into());
    Ok(Json(am.update(&state.db).await?))
}

#[utoipa::path(delete, path = "/admin/users/{id}", tag = "admin", responses((status = 200, description = "Account removed"), (status = 400, description = "Cannot delete yourself"), (status = 404, description = "Not found")))]
pub async fn delete_user(
    State(state): State<ServerState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if id == admin.id {
        return Err(ApiError::BadRequest("you cannot delete your own account".into()));
    }
    user::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
    user::hard_delete(&state.db, id).await?;
    Ok(Json(serde_json::json!({"message": "user deleted"})))
}

#[utoipa::path(get, path = "/admin/recipes", tag = "admin", responses((status = 200, description = "All recipes"), (status = 403, description = "Admin only")))]
pub async fn list_recipes(
    State(state): State<ServerState>,
    Query(page): Query<ListQuery>,
) -> Result<Json<Vec<recipe::Model>>, ApiError> {
    let page = page.clamped(MAX_PAGE);
    Ok(Json(
        recipe::Entity::find()
            .offset(page.skip)
            .limit(page.limit)
            .all(&state.db)
            .await?,
    ))
}

#[utoipa::path(delete, path = "/admin/recipes/{id}", tag = "admin", responses((status = 200, description = "Recipe removed"), (status = 404, description = "Not found")))]
pub async fn delete_recipe(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    recipe::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("recipe not found".into()))?;
    recipe::hard_delete(&state.db, id).await?;
    Ok(Json(serde_json::json!({"message": "recipe deleted"})))
}

#[utoipa::path(get, path = "/admin/meal-plans", tag = "admin", responses((status = 200, description = "All meal plans"), (status = 403, description = "Admin only")))]
pub async fn list_meal_plans(
    State(state): State<ServerState>,
    Query(page): Query<ListQuery>,
) -> Result<Json<Vec<meal_plan::Model>>, ApiError> {
    let page = page.clamped(MAX_PAGE);
    Ok(Json(
        meal_plan::Entity::find()
            .offset(page.skip)
            .limit(page.limit)
            .all(&state.db)
            .await?,
    ))
}

#[utoipa::path(delete, path = "/admin/meal-plans/{id}", tag = "admin", responses((status = 200, description = "Meal plan removed"), (status = 404, description = "Not found")))]
pub async fn delete_meal_plan(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    meal_plan::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("meal plan not found".into()))?;
    meal_plan::hard_delete(&state.db, id).await?;
    Ok(Json(serde_json::json!({"message": "meal plan deleted"})))
}

#[utoipa::path(get, path = "/admin/ratings", tag = "admin", responses((status = 200, description = "All ratings"), (status = 403, description = "Admin only")))]
pub async fn list_ratings(
    State(state): State<ServerState>,
    Query(page): Query<ListQuery>,
) -> Result<Json<Vec<rating::Model>>, ApiError> {
    let page = page.clamped(MAX_PAGE);
    Ok(Json(
        rating::Entity::find()
            .offset(page.skip)
            .limit(page.limit)
            .all(&state.db)
            .await?,
    ))
}

#[utoipa::path(delete, path = "/admin/ratings/{id}", tag = "admin", responses((status = 200, description = "Rating removed"), (status = 404, description = "Not found")))]
pub async fn delete_rating(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    rating::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("rating not found".into()))?;
    rating::hard_delete(&state.db, id).await?;
    Ok(Json(serde_json::json!({"message": "rating deleted"})))
}
