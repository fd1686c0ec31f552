use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Serialize;

use service::auth::domain::{AuthUser, LoginInput, RegisterInput};
use service::auth::repo::seaorm::{to_auth_user, SeaOrmAuthRepository};
use service::auth::service::{AuthConfig, AuthService};

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

#[derive(Serialize)]
pub struct LoginOutput {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: AuthUser,
}

fn auth_service(state: &ServerState) -> AuthService<SeaOrmAuthRepository> {
    AuthService::new(
        Arc::new(SeaOrmAuthRepository { db: state.db.clone() }),
        AuthConfig {
            jwt_secret: state.auth.jwt_secret.clone(),
            token_ttl_minutes: state.auth.token_ttl_minutes,
            password_algorithm: "argon2".into(),
        },
    )
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 200, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Email already registered")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<Json<AuthUser>, ApiError> {
    let user = auth_service(&state).register(input).await?;
    Ok(Json(user))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Token issued"), (status = 401, description = "Invalid credentials"), (status = 403, description = "Account deactivated")))]
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<LoginOutput>, ApiError> {
    let session = auth_service(&state).login(input).await?;
    Ok(Json(LoginOutput {
        access_token: session.token,
        token_type: "bearer",
        user: session.user,
    }))
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", responses((status = 200, description = "Current account"), (status = 401, description = "Unauthorized")))]
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<AuthUser> {
    Json(to_auth_user(user))
}

#[utoipa::path(put, path = "/auth/profile", tag = "auth", request_body = crate::openapi::ProfileUpdateRequest, responses((status = 200, description = "Profile updated"), (status = 401, description = "Unauthorized")))]
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(patch): Json<models::user::ProfilePatch>,
) -> Result<Json<AuthUser>, ApiError> {
    let updated = models::user::update_profile(&state.db, user.id, patch).await?;
    Ok(Json(to_auth_user(updated)))
}
