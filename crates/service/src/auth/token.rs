use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::AuthUser;
use super::errors::AuthError;

/// JWT claims. `sub` carries the account email, matching what login
/// handed out historically; `uid` is the stable identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: Uuid,
    pub role: String,
    pub exp: i64,
}

pub fn issue(secret: &str, user: &AuthUser, ttl_minutes: i64) -> Result<String, AuthError> {
    let exp = Utc::now() + Duration::minutes(ttl_minutes);
    let claims = Claims {
        sub: user.email.clone(),
        uid: user.id,
        role: user.role.clone(),
        exp: exp.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenError(e.to_string()))
}

pub fn verify(secret: &str, token: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AuthError::TokenError(e.to_string()))
}
