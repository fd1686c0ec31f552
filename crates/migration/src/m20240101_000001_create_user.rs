//! Create `user` table.
//!
//! Stores account data plus the anthropometric profile used for
//! energy-need estimation (gender, birth date, height, weight).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::Email, 255).unique_key().not_null())
                    .col(string_len_null(User::FullName, 128))
                    .col(boolean(User::IsActive).not_null().default(true))
                    .col(string_len(User::Role, 32).not_null().default("user"))
                    .col(string_len_null(User::Gender, 16))
                    .col(date_null(User::DateOfBirth))
                    .col(double_null(User::Height))
                    .col(double_null(User::Weight))
                    // Comma-joined restriction list, e.g. "vegan,peanut_free"
                    .col(string_len_null(User::DietaryPreferences, 255))
                    .col(timestamp_with_time_zone(User::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(User::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Email,
    FullName,
    IsActive,
    Role,
    Gender,
    DateOfBirth,
    Height,
    Weight,
    DietaryPreferences,
    CreatedAt,
    UpdatedAt,
}
