//! Create `meal_plan` table: a recipe placed on a calendar slot.
//!
//! `servings` is the number of portions actually planned; the shopping
//! list scales ingredient amounts by servings / recipe.servings.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MealPlan::Table)
                    .if_not_exists()
                    .col(uuid(MealPlan::Id).primary_key())
                    .col(uuid(MealPlan::OwnerId).not_null())
                    .col(uuid(MealPlan::RecipeId).not_null())
                    .col(date(MealPlan::Date).not_null())
                    // Breakfast | Lunch | Dinner
                    .col(string_len(MealPlan::MealType, 32).not_null())
                    .col(integer(MealPlan::Servings).not_null().default(1))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meal_plan_owner")
                            .from(MealPlan::Table, MealPlan::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meal_plan_recipe")
                            .from(MealPlan::Table, MealPlan::RecipeId)
                            .to(Recipe::Table, Recipe::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MealPlan::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MealPlan {
    Table,
    Id,
    OwnerId,
    RecipeId,
    Date,
    MealType,
    Servings,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Recipe {
    Table,
    Id,
}
