//! Shopping list derivation.
//!
//! The list is never persisted: it is recomputed from the meal plans in
//! a date window, scaling every recipe's ingredients by how many
//! servings were planned versus how many the recipe yields.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ShoppingError {
    #[error("database error: {0}")]
    Db(String),
}

impl From<models::errors::ModelError> for ShoppingError {
    fn from(e: models::errors::ModelError) -> Self {
        ShoppingError::Db(e.to_string())
    }
}

/// One aggregated line on the shopping list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub name: String,
    pub unit: String,
    pub total_amount: f64,
    /// Distinct recipes that contributed to this line.
    pub recipes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingList {
    pub items: Vec<ShoppingItem>,
    pub total_items: usize,
    pub date_range: DateRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One planned recipe with its ingredient lines, ready for aggregation.
#[derive(Debug, Clone)]
pub struct PlannedRecipe {
    pub recipe_name: String,
    /// Servings the recipe yields as written.
    pub recipe_servings: i32,
    /// Servings the plan asks for.
    pub planned_servings: i32,
    pub ingredients: Vec<models::ingredient::IngredientInput>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Aggregate planned recipes into shopping lines.
///
/// Lines are keyed by case-insensitive (name, unit) so "Flour, g" and
/// "flour, G" merge; amounts scale by planned vs. recipe servings.
pub fn aggregate(planned: &[PlannedRecipe]) -> Vec<ShoppingItem> {
    struct Acc {
        name: String,
        unit: String,
        total: f64,
        recipes: Vec<String>,
        seen: HashSet<String>,
    }

    let mut lines: BTreeMap<(String, String), Acc> = BTreeMap::new();
    for p in planned {
        let base = if p.recipe_servings > 0 { p.recipe_servings } else { 1 };
        let multiplier = p.planned_servings as f64 / base as f64;
        for ing in &p.ingredients {
            let key = (ing.name.to_lowercase(), ing.unit.to_lowercase());
            let acc = lines.entry(key).or_insert_with(|| Acc {
                name: ing.name.clone(),
                unit: ing.unit.clone(),
                total: 0.0,
                recipes: Vec::new(),
                seen: HashSet::new(),
            });
            acc.total += ing.amount * multiplier;
            if acc.seen.insert(p.recipe_name.clone()) {
                acc.recipes.push(p.recipe_name.clone());
            }
        }
    }

    lines
        .into_values()
        .map(|acc| ShoppingItem {
            name: acc.name,
            unit: acc.unit,
            total_amount: round2(acc.total),
            recipes: acc.recipes,
        })
        .collect()
}

/// Build the shopping list for an owner's plans in [start, end].
#[instrument(skip(db), fields(owner_id = %owner_id))]
pub async fn build_list(
    db: &DatabaseConnection,
    owner_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<ShoppingList, ShoppingError> {
    let plans =
        models::meal_plan::list_with_recipes(db, owner_id, Some(start_date), Some(end_date))
            .await?;

    let date_range = DateRange { start_date, end_date };
    if plans.is_empty() {
        return Ok(ShoppingList {
            items: Vec::new(),
            total_items: 0,
            date_range,
            message: Some("No meal plans found for the selected date range".into()),
        });
    }

    let recipe_ids: Vec<Uuid> = plans
        .iter()
        .filter_map(|(_, r)| r.as_ref().map(|r| r.id))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let all_ingredients = models::ingredient::list_for_recipes(db, recipe_ids).await?;

    let planned: Vec<PlannedRecipe> = plans
        .iter()
        .filter_map(|(plan, recipe)| {
            let recipe = recipe.as_ref()?;
            Some(PlannedRecipe {
                recipe_name: recipe.name.clone(),
                recipe_servings: recipe.servings,
                planned_servings: plan.servings,
                ingredients: all_ingredients
                    .iter()
                    .filter(|i| i.recipe_id == recipe.id)
                    .map(|i| models::ingredient::IngredientInput {
                        name: i.name.clone(),
                        amount: i.amount,
                        unit: i.unit.clone(),
                    })
                    .collect(),
            })
        })
        .collect();

    let items = aggregate(&planned);
    Ok(ShoppingList {
        total_items: items.len(),
        items,
        date_range,
        message: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::ingredient::IngredientInput;

    fn ing(name: &str, amount: f64, unit: &str) -> IngredientInput {
        IngredientInput { name: name.into(), amount, unit: unit.into() }
    }

    #[test]
    fn scales_by_planned_versus_recipe_servings() {
        let planned = vec![PlannedRecipe {
            recipe_name: "Pancakes".into(),
            recipe_servings: 4,
            planned_servings: 2,
            ingredients: vec![ing("Flour", 200.0, "g")],
        }];
        let items = aggregate(&planned);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].total_amount, 100.0);
        assert_eq!(items[0].recipes, vec!["Pancakes"]);
    }

    #[test]
    fn merges_lines_case_insensitively() {
        let planned = vec![
            PlannedRecipe {
                recipe_name: "Bread".into(),
                recipe_servings: 1,
                planned_servings: 1,
                ingredients: vec![ing("Flour", 500.0, "g")],
            },
            PlannedRecipe {
                recipe_name: "Cake".into(),
                recipe_servings: 1,
                planned_servings: 1,
                ingredients: vec![ing("flour", 250.0, "G")],
            },
        ];
        let items = aggregate(&planned);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].total_amount, 750.0);
        assert_eq!(items[0].recipes, vec!["Bread", "Cake"]);
    }

    #[test]
    fn keeps_same_name_different_unit_apart() {
        let planned = vec![PlannedRecipe {
            recipe_name: "Soup".into(),
            recipe_servings: 1,
            planned_servings: 1,
            ingredients: vec![ing("Milk", 200.0, "ml"), ing("Milk", 2.0, "cup")],
        }];
        let items = aggregate(&planned);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn duplicate_recipe_listed_once_per_line() {
        let planned = vec![
            PlannedRecipe {
                recipe_name: "Omelette".into(),
                recipe_servings: 2,
                planned_servings: 2,
                ingredients: vec![ing("Egg", 3.0, "pcs")],
            },
            PlannedRecipe {
                recipe_name: "Omelette".into(),
                recipe_servings: 2,
                planned_servings: 4,
                ingredients: vec![ing("Egg", 3.0, "pcs")],
            },
        ];
        let items = aggregate(&planned);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].total_amount, 9.0);
        assert_eq!(items[0].recipes, vec!["Omelette"]);
    }

    #[test]
    fn zero_recipe_servings_falls_back_to_one() {
        let planned = vec![PlannedRecipe {
            recipe_name: "Mystery".into(),
            recipe_servings: 0,
            planned_servings: 3,
            ingredients: vec![ing("Salt", 1.0, "tsp")],
        }];
        let items = aggregate(&planned);
        assert_eq!(items[0].total_amount, 3.0);
    }

    #[test]
    fn amounts_round_to_two_decimals() {
        let planned = vec![PlannedRecipe {
            recipe_name: "Dressing".into(),
            recipe_servings: 3,
            planned_servings: 1,
            ingredients: vec![ing("Oil", 1.0, "tbsp")],
        }];
        let items = aggregate(&planned);
        assert_eq!(items[0].total_amount, 0.33);
    }
}
