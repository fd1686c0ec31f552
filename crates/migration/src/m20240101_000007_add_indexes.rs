use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Recipe: lookup by owner and name search
        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_owner")
                    .table(Recipe::Table)
                    .col(Recipe::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_name")
                    .table(Recipe::Table)
                    .col(Recipe::Name)
                    .to_owned(),
            )
            .await?;

        // Ingredient: lookup by recipe
        manager
            .create_index(
                Index::create()
                    .name("idx_ingredient_recipe")
                    .table(Ingredient::Table)
                    .col(Ingredient::RecipeId)
                    .to_owned(),
            )
            .await?;

        // MealPlan: calendar queries by owner and date
        manager
            .create_index(
                Index::create()
                    .name("idx_meal_plan_owner_date")
                    .table(MealPlan::Table)
                    .col(MealPlan::OwnerId)
                    .col(MealPlan::Date)
                    .to_owned(),
            )
            .await?;

        // One plan per owner + date + meal slot
        manager
            .create_index(
                Index::create()
                    .name("uniq_meal_plan_owner_date_slot")
                    .table(MealPlan::Table)
                    .col(MealPlan::OwnerId)
                    .col(MealPlan::Date)
                    .col(MealPlan::MealType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One rating per user + recipe
        manager
            .create_index(
                Index::create()
                    .name("uniq_rating_user_recipe")
                    .table(Rating::Table)
                    .col(Rating::UserId)
                    .col(Rating::RecipeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rating_recipe")
                    .table(Rating::Table)
                    .col(Rating::RecipeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_recipe_owner",
            "idx_recipe_name",
            "idx_ingredient_recipe",
            "idx_meal_plan_owner_date",
            "uniq_meal_plan_owner_date_slot",
            "uniq_rating_user_recipe",
            "idx_rating_recipe",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Recipe {
    Table,
    OwnerId,
    Name,
}

#[derive(DeriveIden)]
enum Ingredient {
    Table,
    RecipeId,
}

#[derive(DeriveIden)]
enum MealPlan {
    Table,
    OwnerId,
    Date,
    MealType,
}

#[derive(DeriveIden)]
enum Rating {
    Table,
    UserId,
    RecipeId,
}
