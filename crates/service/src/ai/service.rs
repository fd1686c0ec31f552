use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument};

use super::client::TextGenerator;
use super::energy::{self, EnergyTargets};
use super::errors::AiError;
use super::json_repair::parse_lenient;
use super::prompts;
use super::types::{GeneratedRecipe, PlanProfile, RecipeSuggestion, WeeklyPlan};

/// AI workflows on top of a text generator.
pub struct AiService {
    generator: Arc<dyn TextGenerator>,
}

impl AiService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// One recipe from a list of available ingredients.
    #[instrument(skip(self, ingredients, dietary_preferences))]
    pub async fn generate_recipe(
        &self,
        ingredients: &[String],
        dietary_preferences: &str,
    ) -> Result<GeneratedRecipe, AiError> {
        if ingredients.is_empty() {
            return Err(AiError::Validation("ingredients list is empty".into()));
        }
        let prompt = prompts::generate_recipe(ingredients, dietary_preferences);
        let raw = self.generator.generate(&prompt).await?;
        let recipe: GeneratedRecipe = parse_lenient(&raw)?;
        info!(recipe = %recipe.name, "recipe_generated");
        Ok(recipe)
    }

    /// Seven-day plan with full recipes, sized to the profile's energy
    /// needs. Returns the computed targets alongside the plan so the
    /// caller can report them.
    #[instrument(skip(self, profile))]
    pub async fn suggest_weekly_plan(
        &self,
        profile: &PlanProfile,
        today: NaiveDate,
    ) -> Result<(EnergyTargets, WeeklyPlan), AiError> {
        let targets = energy::targets(
            &profile.gender,
            profile.weight,
            profile.height,
            profile.date_of_birth,
            today,
            &profile.activity_level,
            &profile.goal,
        );
        let prompt = prompts::weekly_plan(profile, &targets);
        let raw = self.generator.generate(&prompt).await?;
        let plan: WeeklyPlan = parse_lenient(&raw)?;
        if plan.meal_plan.is_empty() {
            return Err(AiError::Parse("weekly plan has no days".into()));
        }
        if plan.recipes.is_empty() {
            return Err(AiError::Parse("weekly plan has no recipes".into()));
        }
        info!(
            days = plan.meal_plan.len(),
            recipes = plan.recipes.len(),
            target_calories = targets.target_calories,
            "weekly_plan_generated"
        );
        Ok((targets, plan))
    }

    /// Five-or-so suggestions for a free-text query.
    #[instrument(skip(self, query, dietary_preferences))]
    pub async fn search_recipes(
        &self,
        query: &str,
        dietary_preferences: &str,
    ) -> Result<Vec<RecipeSuggestion>, AiError> {
        if query.trim().is_empty() {
            return Err(AiError::Validation("query is empty".into()));
        }
        let prompt = prompts::search_recipes(query, dietary_preferences);
        let raw = self.generator.generate(&prompt).await?;
        let suggestions: Vec<RecipeSuggestion> = parse_lenient(&raw)?;
        info!(count = suggestions.len(), "recipe_suggestions_generated");
        Ok(suggestions)
    }
}
