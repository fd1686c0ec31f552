use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{ingredient, meal_plan, rating, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
    pub servings: i32,
    pub prep_time: Option<i32>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub tags: Option<String>,
    /// `None` marks a public recipe visible to every user.
    pub owner_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Owner,
    Ingredients,
    MealPlans,
    Ratings,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(user::Entity)
                .from(Column::OwnerId)
                .to(user::Column::Id)
                .into(),
            Relation::Ingredients => ingredient::Relation::Recipe.def().rev(),
            Relation::MealPlans => meal_plan::Relation::Recipe.def().rev(),
            Relation::Ratings => rating::Relation::Recipe.def().rev(),
        }
    }
}

impl Related<ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredients.def()
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

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Recipe fields shared by create and full-update operations.
#[derive(Debug, Clone, Default)]
pub struct RecipeInput {
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
    pub servings: i32,
    pub prep_time: Option<i32>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub tags: Option<String>,
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("recipe name required".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    owner_id: Option<Uuid>,
    input: RecipeInput,
) -> Result<Model, ModelError> {
    validate_name(&input.name)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        description: Set(input.description),
        instructions: Set(input.instructions),
        image_url: Set(input.image_url),
        servings: Set(if input.servings > 0 { input.servings } else { 1 }),
        prep_time: Set(input.prep_time),
        calories: Set(input.calories),
        protein: Set(input.protein),
        carbs: Set(input.carbs),
        fat: Set(input.fat),
        tags: Set(input.tags),
        owner_id: Set(owner_id),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    existing: Model,
    input: RecipeInput,
) -> Result<Model, ModelError> {
    validate_name(&input.name)?;
    let mut am: ActiveModel = existing.into();
    am.name = Set(input.name);
    am.description = Set(input.description);
    am.instructions = Set(input.instructions);
    am.image_url = Set(input.image_url);
    am.servings = Set(if input.servings > 0 { input.servings } else { 1 });
    am.prep_time = Set(input.prep_time);
    am.calories = Set(input.calories);
    am.protein = Set(input.protein);
    am.carbs = Set(input.carbs);
    am.fat = Set(input.fat);
    am.tags = Set(input.tags);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// Delete the recipe row; ingredients, ratings and meal plans cascade.
pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ModelError> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
