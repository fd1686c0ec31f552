use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::{meal_plan, recipe};

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

fn default_servings() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct PlanPayload {
    pub date: NaiveDate,
    pub meal_type: String,
    pub recipe_id: Uuid,
    #[serde(default = "default_servings")]
    pub servings: i32,
}

#[derive(Debug, Deserialize)]
pub struct PlanListQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct PlanOut {
    #[serde(flatten)]
    pub plan: meal_plan::Model,
    pub recipe: Option<recipe::Model>,
}

#[utoipa::path(get, path = "/plans", tag = "plans", responses((status = 200, description = "Plans in calendar order"), (status = 401, description = "Unauthorized")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(q): Query<PlanListQuery>,
) -> Result<Json<Vec<PlanOut>>, ApiError> {
    let rows =
        meal_plan::list_with_recipes(&state.db, user.id, q.start_date, q.end_date).await?;
    Ok(Json(
        rows.into_iter()
            .map(|(plan, recipe)| PlanOut { plan, recipe })
            .collect(),
    ))
}

#[utoipa::path(post, path = "/plans", tag = "plans", request_body = crate::openapi::PlanRequest, responses((status = 200, description = "Plan created"), (status = 400, description = "Slot already taken"), (status = 404, description = "Recipe not found")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<PlanPayload>,
) -> Result<Json<PlanOut>, ApiError> {
    let recipe = recipe::find(&state.db, payload.recipe_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("recipe not found".into()))?;

    meal_plan::validate_meal_type(&payload.meal_type)?;
    let taken =
        meal_plan::find_slot(&state.db, user.id, payload.date, &payload.meal_type).await?;
    if taken.is_some() {
        return Err(ApiError::BadRequest(format!(
            "a meal is already planned for {} on {}; remove or update it first",
            payload.meal_type, payload.date
        )));
    }

    let created = meal_plan::create(
        &state.db,
        user.id,
        payload.recipe_id,
        payload.date,
        &payload.meal_type,
        payload.servings,
    )
    .await?;
    Ok(Json(PlanOut { plan: created, recipe: Some(recipe) }))
}

#[utoipa::path(put, path = "/plans/{id}", tag = "plans", request_body = crate::openapi::PlanRequest, responses((status = 200, description = "Plan updated"), (status = 403, description = "Not the owner"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PlanPayload>,
) -> Result<Json<PlanOut>, ApiError> {
    let existing = meal_plan::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("meal plan not found".into()))?;
    if existing.owner_id != user.id {
        return Err(ApiError::Forbidden("you do not own this meal plan".into()));
    }

    let recipe = recipe::find(&state.db, payload.recipe_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("recipe not found".into()))?;
    meal_plan::validate_meal_type(&payload.meal_type)?;

    // Moving onto an occupied slot (other than this plan's own) is a conflict.
    if let Some(other) =
        meal_plan::find_slot(&state.db, user.id, payload.date, &payload.meal_type).await?
    {
        if other.id != id {
            return Err(ApiError::BadRequest(format!(
                "a meal is already planned for {} on {}; remove or update it first",
                payload.meal_type, payload.date
            )));
        }
    }

    let mut am: meal_plan::ActiveModel = existing.into();
    am.date = Set(payload.date);
    am.meal_type = Set(payload.meal_type);
    am.recipe_id = Set(payload.recipe_id);
    am.servings = Set(if payload.servings > 0 { payload.servings } else { 1 });
    let updated = am.update(&state.db).await?;
    Ok(Json(PlanOut { plan: updated, recipe: Some(recipe) }))
}

#[utoipa::path(delete, path = "/plans/{id}", tag = "plans", responses((status = 200, description = "Plan deleted"), (status = 403, description = "Not the owner"), (status = 404, description = "Not found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let existing = meal_plan::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("meal plan not found".into()))?;
    if existing.owner_id != user.id {
        return Err(ApiError::Forbidden("you do not own this meal plan".into()));
    }
    meal_plan::hard_delete(&state.db, id).await?;
    Ok(Json(serde_json::json!({"message": "meal plan deleted"})))
}
