//! Create `rating` table: 1-5 stars plus an optional comment.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(uuid(Rating::Id).primary_key())
                    .col(uuid(Rating::UserId).not_null())
                    .col(uuid(Rating::RecipeId).not_null())
                    .col(integer(Rating::Stars).not_null())
                    .col(text_null(Rating::Comment))
                    .col(timestamp_with_time_zone(Rating::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_user")
                            .from(Rating::Table, Rating::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_recipe")
                            .from(Rating::Table, Rating::RecipeId)
                            .to(Recipe::Table, Recipe::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Rating::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Rating {
    Table,
    Id,
    UserId,
    RecipeId,
    Stars,
    Comment,
    CreatedAt,
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
