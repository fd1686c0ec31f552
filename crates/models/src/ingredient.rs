use sea_orm::{entity::prelude::*, ActiveModelTrait, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::recipe;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ingredient")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Recipe,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Recipe => Entity::belongs_to(recipe::Entity)
                .from(Column::RecipeId)
                .to(recipe::Column::Id)
                .into(),
        }
    }
}

impl Related<recipe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipe.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// One ingredient line as supplied by clients (no id yet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientInput {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

pub async fn create_for_recipe<C: ConnectionTrait>(
    db: &C,
    recipe_id: Uuid,
    items: Vec<IngredientInput>,
) -> Result<(), ModelError> {
    for item in items {
        let am = ActiveModel {
            id: Set(Uuid::new_v4()),
            recipe_id: Set(recipe_id),
            name: Set(item.name),
            amount: Set(item.amount),
            unit: Set(item.unit),
        };
        am.insert(db).await?;
    }
    Ok(())
}

/// Full replacement of a recipe's ingredient list, as recipe update does.
pub async fn replace_for_recipe<C: ConnectionTrait>(
    db: &C,
    recipe_id: Uuid,
    items: Vec<IngredientInput>,
) -> Result<(), ModelError> {
    Entity::delete_many()
        .filter(Column::RecipeId.eq(recipe_id))
        .exec(db)
        .await?;
    create_for_recipe(db, recipe_id, items).await
}

/// Ingredients for a batch of recipes in one round trip.
pub async fn list_for_recipes<C: ConnectionTrait>(
    db: &C,
    recipe_ids: Vec<Uuid>,
) -> Result<Vec<Model>, ModelError> {
    if recipe_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(Entity::find()
        .filter(Column::RecipeId.is_in(recipe_ids))
        .all(db)
        .await?)
}

pub async fn list_for_recipe<C: ConnectionTrait>(
    db: &C,
    recipe_id: Uuid,
) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::RecipeId.eq(recipe_id))
        .all(db)
        .await?)
}
