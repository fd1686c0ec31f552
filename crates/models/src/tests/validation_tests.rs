use crate::{meal_plan, rating, recipe, user};

#[test]
fn email_must_contain_at() {
    assert!(user::validate_email("user@example.com").is_ok());
    assert!(user::validate_email("nope").is_err());
    assert!(user::validate_email("@").is_err());
}

#[test]
fn recipe_name_required() {
    assert!(recipe::validate_name("Pho bo").is_ok());
    assert!(recipe::validate_name("   ").is_err());
}

#[test]
fn meal_type_is_closed_set() {
    for slot in meal_plan::MEAL_TYPES {
        assert!(meal_plan::validate_meal_type(slot).is_ok());
    }
    assert!(meal_plan::validate_meal_type("Brunch").is_err());
    assert!(meal_plan::validate_meal_type("breakfast").is_err());
}

#[test]
fn stars_bounded_one_to_five() {
    assert!(rating::validate_stars(1).is_ok());
    assert!(rating::validate_stars(5).is_ok());
    assert!(rating::validate_stars(0).is_err());
    assert!(rating::validate_stars(6).is_err());
}
