//! Shared server state and the bearer-token middlewares.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use sea_orm::DatabaseConnection;
use tracing::warn;

use service::ai::AiService;
use service::auth::token;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub ai: Arc<AiService>,
}

/// The authenticated user, inserted as a request extension.
#[derive(Clone)]
pub struct CurrentUser(pub models::user::Model);

/// Resolve `Authorization: Bearer <token>` into the account it names.
async fn authenticate(state: &ServerState, req: &mut Request) -> Result<CurrentUser, ApiError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".into()))?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("expected Bearer token".into()))?;

    let claims = token::verify(&state.auth.jwt_secret, token).map_err(|e| {
        warn!(path = %req.uri().path(), error = %e, "token rejected");
        ApiError::Unauthorized("invalid or expired token".into())
    })?;

    let user = models::user::find_by_email(&state.db, &claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("invalid or expired token".into()))?;
    if !user.is_active {
        return Err(ApiError::Forbidden("account deactivated".into()));
    }
    Ok(CurrentUser(user))
}

pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let current = authenticate(&state, &mut req).await?;
    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

pub async fn require_admin(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let current = authenticate(&state, &mut req).await?;
    if current.0.role != models::user::ROLE_ADMIN {
        return Err(ApiError::Forbidden("admin access required".into()));
    }
    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}
