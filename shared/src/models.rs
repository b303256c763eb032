//! Data models for the FitForge knowledge base and training logs

use crate::health_metrics::{ActivityLevel, Goal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Exercise reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub target_muscle: String,
    /// Comma-delimited list, e.g. "Barbell, Bench"
    pub equipment: String,
    pub instructions: Option<String>,
    pub video_url: Option<String>,
}

/// Food reference data, normalized per 100 g
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    pub name: String,
    pub calories_per_100g: f64,
    pub protein_g_per_100g: f64,
    pub carbs_g_per_100g: f64,
    pub fat_g_per_100g: f64,
}

/// Nutrition for a specific portion of a food
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortionNutrition {
    pub calories: i64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl Food {
    /// Scale the per-100g profile to a portion.
    ///
    /// Calories round to whole numbers, macros to one decimal.
    pub fn portion(&self, weight_grams: f64) -> PortionNutrition {
        let multiplier = weight_grams / 100.0;
        PortionNutrition {
            calories: (self.calories_per_100g * multiplier).round() as i64,
            protein_g: crate::round_to(self.protein_g_per_100g * multiplier, 1),
            carbs_g: crate::round_to(self.carbs_g_per_100g * multiplier, 1),
            fat_g: crate::round_to(self.fat_g_per_100g * multiplier, 1),
        }
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Optional one-to-one profile of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub age: i32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub gender: String,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

/// Completed set block for an exercise. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: i64,
    pub user_id: i64,
    pub exercise_id: i64,
    pub sets: i32,
    pub reps: i32,
    pub weight_kg: f64,
    pub logged_at: DateTime<Utc>,
}

/// Body weight entry. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightLog {
    pub id: i64,
    pub user_id: i64,
    pub weight_kg: f64,
    pub logged_at: DateTime<Utc>,
}
