//! FitForge WASM Module
//!
//! Browser bindings for the pure calculators, so the frontend can show
//! instant estimates without a round-trip to the coach.

use fitforge_shared::health_metrics;
use wasm_bindgen::prelude::*;

/// Calculate BMI from weight (kg) and height (cm), rounded to one decimal
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    if height_cm <= 0.0 {
        return 0.0;
    }
    health_metrics::calculate_bmi_result(weight_kg, height_cm).value
}

/// BMI sentence, identical to the coach's tool output
#[wasm_bindgen]
pub fn bmi_summary(weight_kg: f64, height_cm: f64) -> String {
    health_metrics::bmi_summary(weight_kg, height_cm)
}

/// Daily calorie and macro targets as a JSON object
/// `{calories, protein_g, carbs_g, fat_g}`
#[wasm_bindgen]
pub fn calculate_tdee_and_macros(
    weight_kg: f64,
    height_cm: f64,
    age: i32,
    gender: &str,
    activity_level: &str,
    goal: &str,
) -> String {
    let targets = health_metrics::calculate_tdee_and_macros(
        weight_kg,
        height_cm,
        age,
        gender,
        activity_level,
        goal,
    );
    serde_json::to_string(&targets).unwrap_or_else(|_| "{}".to_string())
}

/// One-rep-max sentence for a set
#[wasm_bindgen]
pub fn estimate_one_rep_max(weight_kg: f64, reps: i32) -> String {
    health_metrics::one_rep_max_summary(weight_kg, reps)
}
