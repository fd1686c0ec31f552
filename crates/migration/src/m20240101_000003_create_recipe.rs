//! Create `recipe` table.
//!
//! `owner_id` is nullable: recipes without an owner are public and
//! visible to every user.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Recipe::Table)
                    .if_not_exists()
                    .col(uuid(Recipe::Id).primary_key())
                    .col(string_len(Recipe::Name, 255).not_null())
                    .col(text_null(Recipe::Description))
                    .col(text_null(Recipe::Instructions))
                    .col(string_len_null(Recipe::ImageUrl, 512))
                    .col(integer(Recipe::Servings).not_null().default(1))
                    .col(integer_null(Recipe::PrepTime))
                    .col(double_null(Recipe::Calories))
                    .col(double_null(Recipe::Protein))
                    .col(double_null(Recipe::Carbs))
                    .col(double_null(Recipe::Fat))
                    // Comma-joined, e.g. "Breakfast,Low-Carb"
                    .col(string_len_null(Recipe::Tags, 255))
                    .col(ColumnDef::new(Recipe::OwnerId).uuid().null())
                    .col(timestamp_with_time_zone(Recipe::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Recipe::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_owner")
                            .from(Recipe::Table, Recipe::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Recipe::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Recipe {
    Table,
    Id,
    Name,
    Description,
    Instructions,
    ImageUrl,
    Servings,
    PrepTime,
    Calories,
    Protein,
    Carbs,
    Fat,
    Tags,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
