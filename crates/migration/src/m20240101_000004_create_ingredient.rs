//! Create `ingredient` table with FK to `recipe`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ingredient::Table)
                    .if_not_exists()
                    .col(uuid(Ingredient::Id).primary_key())
                    .col(uuid(Ingredient::RecipeId).not_null())
                    .col(string_len(Ingredient::Name, 255).not_null())
                    .col(double(Ingredient::Amount).not_null())
                    .col(string_len(Ingredient::Unit, 64).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ingredient_recipe")
                            .from(Ingredient::Table, Ingredient::RecipeId)
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
            .drop_table(Table::drop().table(Ingredient::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Ingredient {
    Table,
    Id,
    RecipeId,
    Name,
    Amount,
    Unit,
}

#[derive(DeriveIden)]
enum Recipe {
    Table,
    Id,
}
