use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::domain::{AuthUser, Credentials, RegisterInput};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

pub fn to_auth_user(u: models::user::Model) -> AuthUser {
    AuthUser {
        id: u.id,
        email: u.email,
        full_name: u.full_name,
        is_active: u.is_active,
        role: u.role,
        gender: u.gender,
        date_of_birth: u.date_of_birth,
        height: u.height,
        weight: u.weight,
        dietary_preferences: u.dietary_preferences,
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_auth_user))
    }

    async fn create_user(&self, input: &RegisterInput) -> Result<AuthUser, AuthError> {
        let created = models::user::create(
            &self.db,
            models::user::NewUser {
                email: input.email.clone(),
                full_name: input.full_name.clone(),
                gender: input.gender.clone(),
                date_of_birth: input.date_of_birth,
                height: input.height,
                weight: input.weight,
                dietary_preferences: input.dietary_preferences.clone(),
            },
        )
        .await
        .map_err(|e| AuthError::Validation(e.to_string()))?;
        Ok(to_auth_user(created))
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::user_credentials::find_by_user(&self.db, user_id)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|c| Credentials {
            user_id: c.user_id,
            password_hash: c.password_hash,
            password_algorithm: c.password_algorithm,
        }))
    }

    async fn upsert_password(
        &self,
        user_id: Uuid,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<Credentials, AuthError> {
        let c = models::user_credentials::upsert_password(
            &self.db,
            user_id,
            password_hash,
            &password_algorithm,
        )
        .await
        .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(Credentials {
            user_id: c.user_id,
            password_hash: c.password_hash,
            password_algorithm: c.password_algorithm,
        })
    }
}
