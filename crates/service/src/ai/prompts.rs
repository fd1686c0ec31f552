//! Prompt builders. Each asks for bare JSON with an explicit example of
//! the expected structure; the repair layer handles the models that
//! ignore the "no markdown" instruction anyway.

use super::energy::EnergyTargets;
use super::types::PlanProfile;

fn or_none(value: &str) -> &str {
    if value.trim().is_empty() {
        "None"
    } else {
        value
    }
}

/// Prompt for a single recipe built from available ingredients.
pub fn generate_recipe(ingredients: &[String], dietary_preferences: &str) -> String {
    format!(
        r#"You are a professional chef. Create one recipe from the following ingredients:

**Available ingredients:** {ingredients}

**Dietary restrictions:** {restrictions}

Return JSON with EXACTLY this structure (do NOT add markdown ```json):
{{
    "name": "Dish name",
    "description": "Short description of the dish",
    "instructions": "Detailed cooking steps (one step per line)",
    "servings": 2,
    "prep_time": 30,
    "ingredients": [
        {{"name": "Rice", "amount": 200, "unit": "gram"}},
        {{"name": "Chicken breast", "amount": 150, "unit": "gram"}}
    ],
    "nutrition": {{
        "calories": 450,
        "protein": 25,
        "carbs": 60,
        "fat": 12
    }},
    "tags": "Lunch,High-Protein"
}}"#,
        ingredients = ingredients.join(", "),
        restrictions = or_none(dietary_preferences),
    )
}

/// Prompt for a seven-day plan with full recipes, sized to the user's
/// calorie target.
pub fn weekly_plan(profile: &PlanProfile, energy: &EnergyTargets) -> String {
    format!(
        r#"You are a nutritionist and professional chef. Create a 7-day meal plan WITH FULL RECIPES for:

**User profile:**
- Gender: {gender}
- Weight: {weight}kg
- Height: {height}cm
- Age: {age}
- BMR: {bmr} kcal/day
- TDEE: {tdee} kcal/day
- Goal: {goal}
- Target calories: {target} kcal/day
- Dietary restrictions: {restrictions}
- Additional notes: {notes}

**IMPORTANT REQUIREMENTS:**
1. Create a FULL RECIPE for every dish (ingredients, instructions, nutrition)
2. Every dish name must be UNIQUE (no duplicates)
3. Balance macros roughly 30% protein, 50% carbs, 20% fat
4. Easy to cook with commonly available ingredients

Return JSON with EXACTLY this structure (do NOT add markdown ```json):
{{
    "total_calories_per_day": {target},
    "recipes": [
        {{
            "name": "Steamed chicken rice with mushrooms",
            "description": "Fragrant steamed chicken rice, high in protein",
            "instructions": "Step 1: Season the chicken\nStep 2: Steam chicken with mushrooms for 20 minutes\nStep 3: Cook the rice and combine",
            "servings": 1,
            "prep_time": 30,
            "ingredients": [
                {{"name": "Rice", "amount": 100, "unit": "gram"}},
                {{"name": "Chicken", "amount": 150, "unit": "gram"}},
                {{"name": "Mushrooms", "amount": 50, "unit": "gram"}}
            ],
            "nutrition": {{
                "calories": 450,
                "protein": 35,
                "carbs": 55,
                "fat": 10
            }},
            "tags": "Lunch,High-Protein"
        }}
    ],
    "meal_plan": [
        {{
            "day": "Monday",
            "breakfast": {{"name": "Banana oatmeal porridge", "calories": 350, "protein": 12, "carbs": 60, "fat": 8}},
            "lunch": {{"name": "Steamed chicken rice with mushrooms", "calories": 450, "protein": 35, "carbs": 55, "fat": 10}},
            "dinner": {{"name": "Fish noodle soup", "calories": 400, "protein": 28, "carbs": 50, "fat": 12}}
        }}
    ]
}}

NOTES:
- MUST cover all 7 days (Monday -> Sunday)
- Every name in "meal_plan" must match a recipe in "recipes"
- Daily calories = breakfast + lunch + dinner, close to {target}
- Ingredients must carry a concrete unit (gram, ml, piece...)"#,
        gender = profile.gender,
        weight = profile.weight,
        height = profile.height,
        age = energy.age,
        bmr = energy.bmr,
        tdee = energy.tdee.round(),
        goal = profile.goal,
        target = energy.target_calories,
        restrictions = or_none(&profile.dietary_preferences),
        notes = or_none(&profile.notes),
    )
}

/// Prompt for five recipe suggestions matching a free-text query.
pub fn search_recipes(query: &str, dietary_preferences: &str) -> String {
    format!(
        r#"Suggest 5 dishes for the request: "{query}"
Dietary restrictions: {restrictions}

Return JSON (NO markdown):
[
    {{
        "name": "Dish name",
        "description": "Short description",
        "calories": 450,
        "protein": 25,
        "carbs": 50,
        "fat": 15,
        "tags": "Breakfast,Low-Carb"
    }}
]"#,
        restrictions = or_none(dietary_preferences),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn recipe_prompt_lists_ingredients_and_restrictions() {
        let p = generate_recipe(&["chicken".into(), "rice".into()], "vegetarian");
        assert!(p.contains("chicken, rice"));
        assert!(p.contains("vegetarian"));
    }

    #[test]
    fn empty_restrictions_render_as_none() {
        let p = search_recipes("low carb dinner", "");
        assert!(p.contains("Dietary restrictions: None"));
    }

    #[test]
    fn weekly_prompt_carries_energy_targets() {
        let profile = PlanProfile {
            gender: "male".into(),
            weight: 70.0,
            height: 175.0,
            date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 15).unwrap(),
            dietary_preferences: String::new(),
            activity_level: "moderate".into(),
            goal: "maintain".into(),
            notes: String::new(),
        };
        let energy = crate::ai::energy::targets(
            &profile.gender,
            profile.weight,
            profile.height,
            profile.date_of_birth,
            NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
            &profile.activity_level,
            &profile.goal,
        );
        let p = weekly_plan(&profile, &energy);
        assert!(p.contains(&format!("Target calories: {}", energy.target_calories)));
        assert!(p.contains("Monday -> Sunday"));
    }
}
