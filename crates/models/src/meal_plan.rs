use sea_orm::{
    entity::prelude::*, ActiveModelTrait, ConnectionTrait, DatabaseConnection, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{recipe, user};

pub const MEAL_TYPES: [&str; 3] = ["Breakfast", "Lunch", "Dinner"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meal_plan")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub recipe_id: Uuid,
    pub date: Date,
    pub meal_type: String,
    pub servings: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Owner,
    Recipe,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(user::Entity)
                .from(Column::OwnerId)
                .to(user::Column::Id)
                .into(),
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

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_meal_type(meal_type: &str) -> Result<(), ModelError> {
    if !MEAL_TYPES.contains(&meal_type) {
        return Err(ModelError::Validation(format!(
            "meal_type must be one of {}",
            MEAL_TYPES.join(", ")
        )));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    owner_id: Uuid,
    recipe_id: Uuid,
    date: Date,
    meal_type: &str,
    servings: i32,
) -> Result<Model, ModelError> {
    validate_meal_type(meal_type)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        recipe_id: Set(recipe_id),
        date: Set(date),
        meal_type: Set(meal_type.to_string()),
        servings: Set(if servings > 0 { servings } else { 1 }),
    };
    Ok(am.insert(db).await?)
}

/// Owner's plans in an optional date window, calendar order.
/// Each row is returned together with its recipe.
pub async fn list_with_recipes(
    db: &DatabaseConnection,
    owner_id: Uuid,
    start_date: Option<Date>,
    end_date: Option<Date>,
) -> Result<Vec<(Model, Option<recipe::Model>)>, ModelError> {
    let mut query = Entity::find()
        .find_also_related(recipe::Entity)
        .filter(Column::OwnerId.eq(owner_id));
    if let Some(start) = start_date {
        query = query.filter(Column::Date.gte(start));
    }
    if let Some(end) = end_date {
        query = query.filter(Column::Date.lte(end));
    }
    Ok(query
        .order_by_asc(Column::Date)
        .order_by_asc(Column::MealType)
        .all(db)
        .await?)
}

pub async fn find_slot(
    db: &DatabaseConnection,
    owner_id: Uuid,
    date: Date,
    meal_type: &str,
) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::OwnerId.eq(owner_id))
        .filter(Column::Date.eq(date))
        .filter(Column::MealType.eq(meal_type))
        .one(db)
        .await?)
}

/// Clear an owner's plans inside [start, end], used before re-planning a week.
pub async fn delete_range<C: ConnectionTrait>(
    db: &C,
    owner_id: Uuid,
    start: Date,
    end: Date,
) -> Result<u64, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::OwnerId.eq(owner_id))
        .filter(Column::Date.gte(start))
        .filter(Column::Date.lte(end))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ModelError> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
