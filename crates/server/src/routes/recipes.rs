use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::pagination::ListQuery;
use models::{ingredient, rating, recipe};

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

const MAX_PAGE: u64 = 500;

fn default_servings() -> i32 {
    1
}

/// Create/update payload: recipe fields plus the full ingredient list.
#[derive(Debug, Deserialize)]
pub struct RecipePayload {
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_servings")]
    pub servings: i32,
    pub prep_time: Option<i32>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub tags: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<ingredient::IngredientInput>,
}

impl RecipePayload {
    fn split(self) -> (recipe::RecipeInput, Vec<ingredient::IngredientInput>) {
        let input = recipe::RecipeInput {
            name: self.name,
            description: self.description,
            instructions: self.instructions,
            image_url: self.image_url,
            servings: self.servings,
            prep_time: self.prep_time,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            tags: self.tags,
        };
        (input, self.ingredients)
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeOut {
    #[serde(flatten)]
    pub recipe: recipe::Model,
    pub ingredients: Vec<ingredient::Model>,
}

/// List filters. Pagination fields are spelled out rather than nested:
/// query-string deserialization cannot flatten non-string primitives.
#[derive(Debug, Deserialize)]
pub struct RecipeListQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub my_only: bool,
}

fn default_limit() -> u64 {
    100
}

impl RecipeListQuery {
    fn page(&self) -> ListQuery {
        ListQuery { skip: self.skip, limit: self.limit }.clamped(MAX_PAGE)
    }
}

#[derive(Debug, Deserialize)]
pub struct RatingPayload {
    pub stars: i32,
    pub comment: Option<String>,
}

/// Batch-load ingredients and zip them onto their recipes.
pub async fn attach_ingredients(
    db: &DatabaseConnection,
    recipes: Vec<recipe::Model>,
) -> Result<Vec<RecipeOut>, ApiError> {
    let ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
    let mut by_recipe: HashMap<Uuid, Vec<ingredient::Model>> = HashMap::new();
    for ing in ingredient::list_for_recipes(db, ids).await? {
        by_recipe.entry(ing.recipe_id).or_default().push(ing);
    }
    Ok(recipes
        .into_iter()
        .map(|r| {
            let ingredients = by_recipe.remove(&r.id).unwrap_or_default();
            RecipeOut { recipe: r, ingredients }
        })
        .collect())
}

fn apply_text_filters(
    mut query: sea_orm::Select<recipe::Entity>,
    search: &str,
    tags: &str,
) -> sea_orm::Select<recipe::Entity> {
    if !search.is_empty() {
        query = query.filter(
            Expr::col((recipe::Entity, recipe::Column::Name)).ilike(format!("%{search}%")),
        );
    }
    if !tags.is_empty() {
        query = query
            .filter(Expr::col((recipe::Entity, recipe::Column::Tags)).ilike(format!("%{tags}%")));
    }
    query
}

#[utoipa::path(get, path = "/recipes", tag = "recipes", responses((status = 200, description = "Visible recipes"), (status = 401, description = "Unauthorized")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(q): Query<RecipeListQuery>,
) -> Result<Json<Vec<RecipeOut>>, ApiError> {
    let page = q.page();
    let mut query = recipe::Entity::find();
    if q.my_only {
        query = query.filter(recipe::Column::OwnerId.eq(user.id));
    } else {
        // Own recipes plus the public catalogue (no owner).
        query = query.filter(
            Condition::any()
                .add(recipe::Column::OwnerId.eq(user.id))
                .add(recipe::Column::OwnerId.is_null()),
        );
    }
    query = apply_text_filters(query, &q.search, &q.tags);
    let recipes = query.offset(page.skip).limit(page.limit).all(&state.db).await?;
    Ok(Json(attach_ingredients(&state.db, recipes).await?))
}

#[utoipa::path(get, path = "/recipes/rated", tag = "recipes", responses((status = 200, description = "Recipes with at least one rating"), (status = 401, description = "Unauthorized")))]
pub async fn list_rated(
    State(state): State<ServerState>,
    Query(q): Query<RecipeListQuery>,
) -> Result<Json<Vec<RecipeOut>>, ApiError> {
    let rated_ids: Vec<Uuid> = rating::Entity::find()
        .select_only()
        .column(rating::Column::RecipeId)
        .distinct()
        .into_tuple()
        .all(&state.db)
        .await?;
    if rated_ids.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let page = q.page();
    let mut query = recipe::Entity::find().filter(recipe::Column::Id.is_in(rated_ids));
    query = apply_text_filters(query, &q.search, &q.tags);
    let recipes = query.offset(page.skip).limit(page.limit).all(&state.db).await?;
    Ok(Json(attach_ingredients(&state.db, recipes).await?))
}

#[utoipa::path(get, path = "/recipes/{id}", tag = "recipes", responses((status = 200, description = "Recipe detail"), (status = 404, description = "Not found")))]
pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeOut>, ApiError> {
    let found = recipe::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("recipe not found".into()))?;
    let ingredients = ingredient::list_for_recipe(&state.db, id).await?;
    Ok(Json(RecipeOut { recipe: found, ingredients }))
}

#[utoipa::path(post, path = "/recipes", tag = "recipes", request_body = crate::openapi::RecipeRequest, responses((status = 200, description = "Recipe created"), (status = 400, description = "Bad Request")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<RecipePayload>,
) -> Result<Json<RecipeOut>, ApiError> {
    let (input, ingredients) = payload.split();
    let txn = state.db.begin().await?;
    let created = recipe::create(&txn, Some(user.id), input).await?;
    ingredient::create_for_recipe(&txn, created.id, ingredients).await?;
    txn.commit().await?;

    let ingredients = ingredient::list_for_recipe(&state.db, created.id).await?;
    Ok(Json(RecipeOut { recipe: created, ingredients }))
}

#[utoipa::path(put, path = "/recipes/{id}", tag = "recipes", request_body = crate::openapi::RecipeRequest, responses((status = 200, description = "Recipe updated"), (status = 403, description = "Not the owner"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipePayload>,
) -> Result<Json<RecipeOut>, ApiError> {
    let existing = recipe::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("recipe not found".into()))?;
    if existing.owner_id != Some(user.id) {
        return Err(ApiError::Forbidden("you do not own this recipe".into()));
    }

    let (input, ingredients) = payload.split();
    let txn = state.db.begin().await?;
    let updated = recipe::update(&txn, existing, input).await?;
    ingredient::replace_for_recipe(&txn, id, ingredients).await?;
    txn.commit().await?;

    let ingredients = ingredient::list_for_recipe(&state.db, id).await?;
    Ok(Json(RecipeOut { recipe: updated, ingredients }))
}

#[utoipa::path(delete, path = "/recipes/{id}", tag = "recipes", responses((status = 200, description = "Recipe deleted"), (status = 403, description = "Not the owner"), (status = 404, description = "Not found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let existing = recipe::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("recipe not found".into()))?;
    if existing.owner_id != Some(user.id) {
        return Err(ApiError::Forbidden("you do not own this recipe".into()));
    }
    recipe::hard_delete(&state.db, id).await?;
    Ok(Json(
        serde_json::json!({"message": format!("deleted recipe: {}", existing.name)}),
    ))
}

#[utoipa::path(post, path = "/recipes/{id}/ratings", tag = "ratings", request_body = crate::openapi::RatingRequest, responses((status = 200, description = "Rating stored"), (status = 400, description = "Stars out of range"), (status = 404, description = "Recipe not found")))]
pub async fn rate(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RatingPayload>,
) -> Result<Json<rating::Model>, ApiError> {
    recipe::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("recipe not found".into()))?;
    let saved = rating::upsert(&state.db, user.id, id, payload.stars, payload.comment).await?;
    Ok(Json(saved))
}

#[utoipa::path(get, path = "/recipes/{id}/ratings", tag = "ratings", responses((status = 200, description = "All ratings for the recipe")))]
pub async fn list_ratings(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<rating::Model>>, ApiError> {
    Ok(Json(rating::list_for_recipe(&state.db, id).await?))
}

#[utoipa::path(get, path = "/recipes/{id}/ratings/my", tag = "ratings", responses((status = 200, description = "Own rating"), (status = 404, description = "Not rated yet")))]
pub async fn my_rating(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<rating::Model>, ApiError> {
    let found = rating::find_by_user_and_recipe(&state.db, user.id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("you have not rated this recipe".into()))?;
    Ok(Json(found))
}

#[utoipa::path(delete, path = "/recipes/{id}/ratings/my", tag = "ratings", responses((status = 200, description = "Own rating removed"), (status = 404, description = "Not rated yet")))]
pub async fn delete_my_rating(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let found = rating::find_by_user_and_recipe(&state.db, user.id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("you have not rated this recipe".into()))?;
    rating::hard_delete(&state.db, found.id).await?;
    Ok(Json(serde_json::json!({"message": "rating removed"})))
}
