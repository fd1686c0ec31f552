use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use service::ai::AiError;
use service::auth::errors::AuthError;
use service::shopping::ShoppingError;

/// HTTP-facing error. Every variant renders as `{"error": "..."}` with
/// the matching status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.to_string();
        if status.is_server_error() {
            error!(status = %status, error = %msg, "request failed");
        }
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}

impl From<models::errors::ModelError> for ApiError {
    fn from(e: models::errors::ModelError) -> Self {
        use models::errors::ModelError;
        match e {
            ModelError::Validation(m) => ApiError::BadRequest(m),
            ModelError::NotFound(m) => ApiError::NotFound(m),
            ModelError::Db(m) => ApiError::Internal(m),
        }
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(e: sea_orm::DbErr) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(m) => ApiError::BadRequest(m),
            AuthError::Conflict => ApiError::Conflict(e.to_string()),
            AuthError::NotFound => ApiError::NotFound(e.to_string()),
            AuthError::Unauthorized | AuthError::TokenError(_) => {
                ApiError::Unauthorized("invalid credentials".into())
            }
            AuthError::Deactivated => ApiError::Forbidden(e.to_string()),
            AuthError::HashError(m) | AuthError::Repository(m) => ApiError::Internal(m),
        }
    }
}

impl From<AiError> for ApiError {
    fn from(e: AiError) -> Self {
        match e {
            AiError::Validation(m) => ApiError::BadRequest(m),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ShoppingError> for ApiError {
    fn from(e: ShoppingError) -> Self {
        ApiError::Internal(e.to_string())
    }
}
