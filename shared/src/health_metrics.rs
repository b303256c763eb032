//! Health metrics calculations module
//!
//! Provides the deterministic formulas behind the coaching tools: daily
//! energy and macro targets, BMI and one-rep-max estimation.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Closed Enumerations**: Activity level and goal are enums, with an
//!    explicit lenient parser for free-form tool input
//! 3. **Stable Text**: The `*_summary` functions produce the exact sentences
//!    the assistant reasons over

use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calories added or removed from maintenance for a fat-loss or muscle-gain goal
pub const GOAL_CALORIE_ADJUSTMENT: f64 = 500.0;

/// Above this rep count the Brzycki estimate is not evaluated
pub const MAX_RELIABLE_REPS: i32 = 12;

const PROTEIN_SHARE: f64 = 0.30;
const CARBS_SHARE: f64 = 0.40;
const FAT_SHARE: f64 = 0.30;
const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Round half away from zero to a number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// ============================================================================
// User Profile Types
// ============================================================================

/// Biological sex for health calculations
/// Note: This is used for physiological calculations only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    Male,
    Female,
}

impl BiologicalSex {
    /// Map a free-form gender string onto the BMR formula variant.
    ///
    /// Only the case-insensitive literal `male` selects the male formula;
    /// every other value uses the alternate one.
    pub fn from_gender(gender: &str) -> Self {
        if gender.eq_ignore_ascii_case("male") {
            BiologicalSex::Male
        } else {
            BiologicalSex::Female
        }
    }
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    #[default]
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 4] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
    ];

    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
        }
    }

    /// Wire name, as stored in the database and accepted by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::LightlyActive => "Light exercise 1-3 days/week",
            ActivityLevel::ModeratelyActive => "Moderate exercise 3-5 days/week",
            ActivityLevel::VeryActive => "Hard exercise 6-7 days/week",
        }
    }

    /// Parse tool input, falling back to sedentary for unknown values
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for ActivityLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ActivityLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| DomainError::InvalidActivityLevel(s.to_string()))
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body composition goal driving the calorie adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseFat,
    BuildMuscle,
    #[default]
    Maintain,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::LoseFat, Goal::BuildMuscle, Goal::Maintain];

    /// Calories added to maintenance for this goal
    pub fn calorie_adjustment(&self) -> f64 {
        match self {
            Goal::LoseFat => -GOAL_CALORIE_ADJUSTMENT,
            Goal::BuildMuscle => GOAL_CALORIE_ADJUSTMENT,
            Goal::Maintain => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::LoseFat => "lose_fat",
            Goal::BuildMuscle => "build_muscle",
            Goal::Maintain => "maintain",
        }
    }

    /// Parse tool input, falling back to maintenance for unknown values
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for Goal {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Goal::ALL
            .into_iter()
            .find(|goal| goal.as_str() == normalized)
            .ok_or_else(|| DomainError::InvalidGoal(s.to_string()))
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User profile data needed for energy calculations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthProfile {
    /// Height in centimeters
    pub height_cm: f64,
    /// Current weight in kilograms
    pub weight_kg: f64,
    /// Age in whole years
    pub age_years: i32,
    /// Biological sex for physiological calculations
    pub sex: BiologicalSex,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

// ============================================================================
// BMR, TDEE and Macro Calculations
// ============================================================================

/// Daily calorie and macronutrient targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub calories: i64,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fat_g: i64,
}

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn calculate_bmr_mifflin(weight_kg: f64, height_cm: f64, age_years: i32, sex: BiologicalSex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match sex {
        BiologicalSex::Male => base + 5.0,
        BiologicalSex::Female => base - 161.0,
    }
}

/// Calculate Total Daily Energy Expenditure
///
/// TDEE = BMR × Activity Multiplier
pub fn calculate_tdee(profile: &HealthProfile) -> f64 {
    let bmr = calculate_bmr_mifflin(profile.weight_kg, profile.height_cm, profile.age_years, profile.sex);
    bmr * profile.activity_level.multiplier()
}

/// Split a calorie target 30/40/30 into protein, carbs and fat grams
pub fn split_macros(target_calories: f64) -> MacroTargets {
    MacroTargets {
        calories: target_calories.round() as i64,
        protein_g: (target_calories * PROTEIN_SHARE / KCAL_PER_GRAM_PROTEIN).round() as i64,
        carbs_g: (target_calories * CARBS_SHARE / KCAL_PER_GRAM_CARBS).round() as i64,
        fat_g: (target_calories * FAT_SHARE / KCAL_PER_GRAM_FAT).round() as i64,
    }
}

/// Calculate goal-adjusted calorie and macro targets for a profile
pub fn calculate_macro_targets(profile: &HealthProfile) -> MacroTargets {
    let target_calories = calculate_tdee(profile) + profile.goal.calorie_adjustment();
    split_macros(target_calories)
}

/// Calculate daily targets from free-form tool arguments
///
/// Unknown activity levels use the sedentary multiplier and unknown goals
/// keep maintenance calories.
pub fn calculate_tdee_and_macros(
    weight_kg: f64,
    height_cm: f64,
    age: i32,
    gender: &str,
    activity_level: &str,
    goal: &str,
) -> MacroTargets {
    let profile = HealthProfile {
        height_cm,
        weight_kg,
        age_years: age,
        sex: BiologicalSex::from_gender(gender),
        activity_level: ActivityLevel::parse_lenient(activity_level),
        goal: Goal::parse_lenient(goal),
    };
    calculate_macro_targets(&profile)
}

// ============================================================================
// BMI Calculations
// ============================================================================

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Get the half-open BMI range for this category
    pub fn range(&self) -> (f64, f64) {
        match self {
            BmiCategory::Underweight => (0.0, 18.5),
            BmiCategory::Normal => (18.5, 25.0),
            BmiCategory::Overweight => (25.0, 30.0),
            BmiCategory::Obese => (30.0, f64::INFINITY),
        }
    }

    /// Get a human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// BMI calculation result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// BMI rounded to one decimal
    pub value: f64,
    pub category: BmiCategory,
}

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Classify BMI into category
///
/// Boundaries are half-open: [18.5, 25) is normal, [25, 30) overweight.
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Calculate the rounded BMI and classify the rounded value
pub fn calculate_bmi_result(weight_kg: f64, height_cm: f64) -> BmiResult {
    let value = round_to(calculate_bmi(weight_kg, height_cm), 1);
    BmiResult {
        value,
        category: classify_bmi(value),
    }
}

/// Sentence describing the BMI for a weight and height
pub fn bmi_summary(weight_kg: f64, height_cm: f64) -> String {
    if height_cm <= 0.0 || !height_cm.is_finite() {
        return "Height must be greater than zero to calculate BMI.".to_string();
    }
    let result = calculate_bmi_result(weight_kg, height_cm);
    format!(
        "A weight of {}kg and height of {}cm results in a BMI of {}, which is in the '{}' category.",
        weight_kg,
        height_cm,
        result.value,
        result.category.label()
    )
}

// ============================================================================
// One-Rep-Max Estimation
// ============================================================================

/// Outcome of a one-rep-max estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OneRepMax {
    /// A single rep was lifted; the weight is the max
    AlreadyMax(f64),
    /// Brzycki estimate, rounded to one decimal
    Estimated(f64),
    /// Too many reps for a reliable estimate
    RepsTooHigh,
    /// Rep count below one
    InvalidReps,
}

/// Brzycki formula: 1RM = weight / (1.0278 - 0.0278 × reps)
pub fn brzycki(weight_kg: f64, reps: i32) -> f64 {
    weight_kg / (1.0278 - 0.0278 * reps as f64)
}

/// Estimate the one-rep max for a set
pub fn estimate_one_rep_max(weight_kg: f64, reps: i32) -> OneRepMax {
    match reps {
        r if r < 1 => OneRepMax::InvalidReps,
        1 => OneRepMax::AlreadyMax(weight_kg),
        r if r > MAX_RELIABLE_REPS => OneRepMax::RepsTooHigh,
        r => OneRepMax::Estimated(round_to(brzycki(weight_kg, r), 1)),
    }
}

/// Sentence describing the one-rep-max estimate for a set
pub fn one_rep_max_summary(weight_kg: f64, reps: i32) -> String {
    match estimate_one_rep_max(weight_kg, reps) {
        OneRepMax::AlreadyMax(max) => format!("Your one-rep max is already {}kg.", max),
        OneRepMax::RepsTooHigh => format!(
            "1RM estimation is most accurate for rep ranges of {} or less.",
            MAX_RELIABLE_REPS
        ),
        OneRepMax::InvalidReps => "Reps must be at least 1 to estimate a one-rep max.".to_string(),
        OneRepMax::Estimated(max) => format!(
            "Lifting {}kg for {} reps gives an estimated one-rep max of {}kg.",
            weight_kg, reps, max
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    // =========================================================================
    // BMI Tests
    // =========================================================================

    #[test]
    fn test_bmi_calculation() {
        let result = calculate_bmi_result(70.0, 175.0);
        assert_eq!(result.value, 22.9);
        assert_eq!(result.category, BmiCategory::Normal);
    }

    #[test]
    fn test_bmi_summary_sentence() {
        assert_eq!(
            bmi_summary(70.0, 175.0),
            "A weight of 70kg and height of 175cm results in a BMI of 22.9, which is in the 'Normal weight' category."
        );
    }

    #[test]
    fn test_bmi_zero_height() {
        assert!(bmi_summary(70.0, 0.0).contains("greater than zero"));
    }

    #[rstest]
    #[case(18.4, BmiCategory::Underweight)]
    #[case(18.5, BmiCategory::Normal)]
    #[case(24.9, BmiCategory::Normal)]
    #[case(24.95, BmiCategory::Normal)]
    #[case(25.0, BmiCategory::Overweight)]
    #[case(29.9, BmiCategory::Overweight)]
    #[case(30.0, BmiCategory::Obese)]
    #[case(42.0, BmiCategory::Obese)]
    fn test_bmi_category_boundaries(#[case] bmi: f64, #[case] expected: BmiCategory) {
        assert_eq!(classify_bmi(bmi), expected);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: every BMI falls in exactly the range of its category
        #[test]
        fn prop_bmi_category_range_contains_value(weight in 20.0f64..300.0, height in 100.0f64..250.0) {
            let result = calculate_bmi_result(weight, height);
            let (min, max) = result.category.range();
            prop_assert!(result.value >= min && result.value < max);
        }

        /// Property: Heavier weight = higher BMI (same height)
        #[test]
        fn prop_bmi_increases_with_weight(
            weight1 in 50.0f64..100.0,
            weight2 in 100.0f64..150.0,
            height in 150.0f64..200.0
        ) {
            prop_assert!(calculate_bmi(weight2, height) > calculate_bmi(weight1, height));
        }
    }

    // =========================================================================
    // BMR/TDEE Tests
    // =========================================================================

    #[test]
    fn test_bmr_mifflin() {
        // 30yo male, 80kg, 180cm -> 800 + 1125 - 150 + 5
        let bmr = calculate_bmr_mifflin(80.0, 180.0, 30, BiologicalSex::Male);
        assert!((bmr - 1780.0).abs() < 1e-9);

        // 30yo female, 60kg, 165cm -> 600 + 1031.25 - 150 - 161
        let bmr = calculate_bmr_mifflin(60.0, 165.0, 30, BiologicalSex::Female);
        assert!((bmr - 1320.25).abs() < 1e-9);
    }

    #[test]
    fn test_only_male_literal_selects_male_formula() {
        assert_eq!(BiologicalSex::from_gender("male"), BiologicalSex::Male);
        assert_eq!(BiologicalSex::from_gender("MALE"), BiologicalSex::Male);
        assert_eq!(BiologicalSex::from_gender("female"), BiologicalSex::Female);
        assert_eq!(BiologicalSex::from_gender("m"), BiologicalSex::Female);
        assert_eq!(BiologicalSex::from_gender("non-binary"), BiologicalSex::Female);
    }

    #[test]
    fn test_tdee_and_macros_known_profile() {
        // BMR 1780 * 1.55 = 2759, -500 = 2259
        let targets = calculate_tdee_and_macros(80.0, 180.0, 30, "male", "moderately_active", "lose_fat");
        assert_eq!(
            targets,
            MacroTargets {
                calories: 2259,
                protein_g: 169,
                carbs_g: 226,
                fat_g: 75,
            }
        );
    }

    #[test]
    fn test_unknown_activity_and_goal_fall_back() {
        let fallback = calculate_tdee_and_macros(80.0, 180.0, 30, "male", "couch_potato", "get_huge");
        let explicit = calculate_tdee_and_macros(80.0, 180.0, 30, "male", "sedentary", "maintain");
        assert_eq!(fallback, explicit);
        assert_eq!(fallback.calories, 2136);
    }

    #[rstest]
    #[case("sedentary", ActivityLevel::Sedentary)]
    #[case("Lightly_Active", ActivityLevel::LightlyActive)]
    #[case(" moderately_active ", ActivityLevel::ModeratelyActive)]
    #[case("very_active", ActivityLevel::VeryActive)]
    fn test_activity_level_parsing(#[case] input: &str, #[case] expected: ActivityLevel) {
        assert_eq!(input.parse::<ActivityLevel>().unwrap(), expected);
    }

    #[test]
    fn test_strict_parsing_rejects_unknown_values() {
        assert!("extra_active".parse::<ActivityLevel>().is_err());
        assert!("bulk".parse::<Goal>().is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: calories follow the goal adjustment and macros the 30/40/30 split
        #[test]
        fn prop_targets_follow_formula(
            weight in 40.0f64..150.0,
            height in 140.0f64..210.0,
            age in 18i32..80,
            male in any::<bool>(),
            activity_idx in 0usize..4,
            goal_idx in 0usize..3
        ) {
            let activity = ActivityLevel::ALL[activity_idx];
            let goal = Goal::ALL[goal_idx];
            let gender = if male { "male" } else { "female" };
            let sex = BiologicalSex::from_gender(gender);

            let targets = calculate_tdee_and_macros(weight, height, age, gender, activity.as_str(), goal.as_str());

            let target = calculate_bmr_mifflin(weight, height, age, sex) * activity.multiplier()
                + goal.calorie_adjustment();
            prop_assert_eq!(targets.calories, target.round() as i64);

            // Each macro is off by at most half a gram of its own rounding
            let macro_kcal = targets.protein_g as f64 * 4.0 + targets.carbs_g as f64 * 4.0 + targets.fat_g as f64 * 9.0;
            prop_assert!((macro_kcal - target).abs() <= 0.5 * (4.0 + 4.0 + 9.0));
            prop_assert!((targets.protein_g as f64 - target * 0.30 / 4.0).abs() <= 0.5);
            prop_assert!((targets.carbs_g as f64 - target * 0.40 / 4.0).abs() <= 0.5);
            prop_assert!((targets.fat_g as f64 - target * 0.30 / 9.0).abs() <= 0.5);
        }

        /// Property: Male BMR > Female BMR (same stats)
        #[test]
        fn prop_male_bmr_higher(
            weight in 50.0f64..100.0,
            height in 160.0f64..190.0,
            age in 20i32..60
        ) {
            let bmr_male = calculate_bmr_mifflin(weight, height, age, BiologicalSex::Male);
            let bmr_female = calculate_bmr_mifflin(weight, height, age, BiologicalSex::Female);
            prop_assert!(bmr_male > bmr_female);
        }
    }

    // =========================================================================
    // One-Rep-Max Tests
    // =========================================================================

    #[test]
    fn test_single_rep_is_already_max() {
        assert_eq!(one_rep_max_summary(100.0, 1), "Your one-rep max is already 100kg.");
    }

    #[test]
    fn test_high_reps_are_not_estimated() {
        assert_eq!(estimate_one_rep_max(100.0, 13), OneRepMax::RepsTooHigh);
        assert_eq!(
            one_rep_max_summary(100.0, 13),
            "1RM estimation is most accurate for rep ranges of 12 or less."
        );
    }

    #[test]
    fn test_brzycki_estimate() {
        // 100 / (1.0278 - 0.139) = 112.51
        assert_eq!(estimate_one_rep_max(100.0, 5), OneRepMax::Estimated(112.5));
        assert_eq!(
            one_rep_max_summary(100.0, 5),
            "Lifting 100kg for 5 reps gives an estimated one-rep max of 112.5kg."
        );
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn test_non_positive_reps_rejected(#[case] reps: i32) {
        assert_eq!(estimate_one_rep_max(100.0, reps), OneRepMax::InvalidReps);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: the estimate is never below the lifted weight
        #[test]
        fn prop_estimate_at_least_lifted(weight in 1.0f64..400.0, reps in 2i32..=12) {
            match estimate_one_rep_max(weight, reps) {
                OneRepMax::Estimated(max) => prop_assert!(max >= round_to(weight, 1)),
                other => prop_assert!(false, "unexpected outcome {:?}", other),
            }
        }
    }
}
