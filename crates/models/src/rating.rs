use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveModelTrait, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{recipe, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rating")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub stars: i32,
    pub comment: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Recipe,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::Recipe => Entity::belongs_to(recipe::Entity)
                .from(Column::RecipeId)
                .to(recipe::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<recipe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipe.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_stars(stars: i32) -> Result<(), ModelError> {
    if !(1..=5).contains(&stars) {
        return Err(ModelError::Validation("stars must be between 1 and 5".into()));
    }
    Ok(())
}

/// One rating per user per recipe: create on first call, overwrite after.
pub async fn upsert(
    db: &DatabaseConnection,
    user_id: Uuid,
    recipe_id: Uuid,
    stars: i32,
    comment: Option<String>,
) -> Result<Model, ModelError> {
    validate_stars(stars)?;
    if let Some(existing) = find_by_user_and_recipe(db, user_id, recipe_id).await? {
        let mut am: ActiveModel = existing.into();
        am.stars = Set(stars);
        am.comment = Set(comment);
        Ok(am.update(db).await?)
    } else {
        let am = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            stars: Set(stars),
            comment: Set(comment),
            created_at: Set(Utc::now().into()),
        };
        Ok(am.insert(db).await?)
    }
}

pub async fn find_by_user_and_recipe(
    db: &DatabaseConnection,
    user_id: Uuid,
    recipe_id: Uuid,
) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::RecipeId.eq(recipe_id))
        .one(db)
        .await?)
}

pub async fn list_for_recipe(
    db: &DatabaseConnection,
    recipe_id: Uuid,
) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::RecipeId.eq(recipe_id))
        .all(db)
        .await?)
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ModelError> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
