//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_user;
mod m20240101_000002_create_user_credentials;
mod m20240101_000003_create_recipe;
mod m20240101_000004_create_ingredient;
mod m20240101_000005_create_meal_plan;
mod m20240101_000006_create_rating;
mod m20240101_000007_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_user::Migration),
            Box::new(m20240101_000002_create_user_credentials::Migration),
            Box::new(m20240101_000003_create_recipe::Migration),
            Box::new(m20240101_000004_create_ingredient::Migration),
            Box::new(m20240101_000005_create_meal_plan::Migration),
            Box::new(m20240101_000006_create_rating::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000007_add_indexes::Migration),
        ]
    }
}
