use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveModelTrait, DatabaseConnection, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{meal_plan, rating, recipe};

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub role: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<Date>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub dietary_preferences: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Recipes,
    MealPlans,
    Ratings,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Recipes => recipe::Relation::Owner.def().rev(),
            Relation::MealPlans => meal_plan::Relation::Owner.def().rev(),
            Relation::Ratings => rating::Relation::User.def().rev(),
        }
    }
}

impl Related<recipe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipes.def()
    }
}

impl Related<meal_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MealPlans.def()
    }
}

impl Related<rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Profile fields a user may change after registration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<Date>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub dietary_preferences: Option<String>,
}

/// New-account input beyond credentials.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<Date>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub dietary_preferences: Option<String>,
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if !email.contains('@') || email.trim().len() < 3 {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, input: NewUser) -> Result<Model, ModelError> {
    validate_email(&input.email)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(input.email),
        full_name: Set(input.full_name),
        is_active: Set(true),
        role: Set(ROLE_USER.to_string()),
        gender: Set(input.gender),
        date_of_birth: Set(input.date_of_birth),
        height: Set(input.height),
        weight: Set(input.weight),
        dietary_preferences: Set(input.dietary_preferences),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?)
}

pub async fn update_profile(
    db: &DatabaseConnection,
    id: Uuid,
    patch: ProfilePatch,
) -> Result<Model, ModelError> {
    let found = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::NotFound("user not found".into()))?;
    let mut am: ActiveModel = found.into();
    if let Some(v) = patch.full_name {
        am.full_name = Set(Some(v));
    }
    if let Some(v) = patch.gender {
        am.gender = Set(Some(v));
    }
    if let Some(v) = patch.date_of_birth {
        am.date_of_birth = Set(Some(v));
    }
    if let Some(v) = patch.height {
        am.height = Set(Some(v));
    }
    if let Some(v) = patch.weight {
        am.weight = Set(Some(v));
    }
    if let Some(v) = patch.dietary_preferences {
        am.dietary_preferences = Set(Some(v));
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn list(
    db: &DatabaseConnection,
    skip: u64,
    limit: u64,
) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().offset(skip).limit(limit).all(db).await?)
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ModelError> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
