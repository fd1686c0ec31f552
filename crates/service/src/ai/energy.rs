//! Daily energy estimation: Mifflin-St Jeor BMR, activity-scaled TDEE
//! and a goal-adjusted calorie target.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyTargets {
    pub age: i32,
    pub bmr: f64,
    pub tdee: f64,
    pub target_calories: i64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Completed years between `date_of_birth` and `today`.
pub fn calculate_age(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Mifflin-St Jeor basal metabolic rate. Weight in kg, height in cm.
pub fn bmr(gender: &str, weight: f64, height: f64, age: i32) -> f64 {
    let base = (10.0 * weight) + (6.25 * height) - (5.0 * f64::from(age));
    let bmr = if gender.eq_ignore_ascii_case("male") {
        base + 5.0
    } else {
        base - 161.0
    };
    round2(bmr)
}

/// Unknown levels fall back to "moderate".
pub fn activity_multiplier(level: &str) -> f64 {
    match level {
        "sedentary" => 1.2,
        "light" => 1.375,
        "moderate" => 1.55,
        "active" => 1.725,
        "very_active" => 1.9,
        _ => 1.55,
    }
}

/// Calorie delta for a weight goal; unknown goals mean maintain.
pub fn goal_adjustment(goal: &str) -> f64 {
    match goal {
        "lose" => -500.0,
        "gain" => 500.0,
        _ => 0.0,
    }
}

pub fn targets(
    gender: &str,
    weight: f64,
    height: f64,
    date_of_birth: NaiveDate,
    today: NaiveDate,
    activity_level: &str,
    goal: &str,
) -> EnergyTargets {
    let age = calculate_age(date_of_birth, today);
    let bmr = bmr(gender, weight, height, age);
    let tdee = bmr * activity_multiplier(activity_level);
    let target_calories = (tdee + goal_adjustment(goal)).round() as i64;
    EnergyTargets { age, bmr, tdee, target_calories }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_counts_completed_years_only() {
        let dob = date(2000, 6, 15);
        assert_eq!(calculate_age(dob, date(2026, 6, 14)), 25);
        assert_eq!(calculate_age(dob, date(2026, 6, 15)), 26);
        assert_eq!(calculate_age(dob, date(2026, 6, 16)), 26);
    }

    #[test]
    fn bmr_mifflin_st_jeor() {
        // male: 10*70 + 6.25*175 - 5*26 + 5 = 1668.75
        assert_eq!(bmr("male", 70.0, 175.0, 26), 1668.75);
        // female: 10*60 + 6.25*165 - 5*30 - 161 = 1320.25
        assert_eq!(bmr("female", 60.0, 165.0, 30), 1320.25);
    }

    #[test]
    fn unknown_activity_level_is_moderate() {
        assert_eq!(activity_multiplier("couch"), 1.55);
        assert_eq!(activity_multiplier("very_active"), 1.9);
    }

    #[test]
    fn target_applies_goal_adjustment() {
        let t = targets("male", 70.0, 175.0, date(2000, 1, 15), date(2026, 8, 28), "moderate", "lose");
        assert_eq!(t.age, 26);
        assert_eq!(t.bmr, 1668.75);
        let expected = (1668.75_f64 * 1.55 - 500.0).round() as i64;
        assert_eq!(t.target_calories, expected);
    }
}
