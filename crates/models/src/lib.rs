pub mod db;
pub mod errors;
pub mod ingredient;
pub mod meal_plan;
pub mod rating;
pub mod recipe;
pub mod user;
pub mod user_credentials;

#[cfg(test)]
mod tests;
