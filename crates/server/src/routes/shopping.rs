use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use service::shopping::{self, ShoppingList};

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct ShoppingQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[utoipa::path(get, path = "/shopping/list", tag = "shopping", responses((status = 200, description = "Aggregated shopping list"), (status = 400, description = "Bad date range"), (status = 401, description = "Unauthorized")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(q): Query<ShoppingQuery>,
) -> Result<Json<ShoppingList>, ApiError> {
    if q.end_date < q.start_date {
        return Err(ApiError::BadRequest("end_date must not precede start_date".into()));
    }
    let list = shopping::build_list(&state.db, user.id, q.start_date, q.end_date).await?;
    Ok(Json(list))
}
