//! Coaching toolkit
//!
//! The nine operations the assistant can call. Calculations delegate to
//! `fitforge_shared::health_metrics`; lookups, logging and progress run
//! against the [`FitnessStore`]. Not-found and insufficient-data outcomes
//! are ordinary sentences; only store failures are errors.

use crate::repositories::{FitnessStore, NewWorkoutLog, StoreResult, WorkoutLogOutcome};
use fitforge_shared::health_metrics::{self, MacroTargets};
use std::sync::Arc;
use tracing::debug;

/// Maximum exercises listed by a muscle lookup
pub const EXERCISE_LOOKUP_LIMIT: i64 = 5;

/// Stateless facade over the store; cheap to clone
#[derive(Clone)]
pub struct FitnessToolkit {
    store: Arc<dyn FitnessStore>,
}

impl FitnessToolkit {
    pub fn new(store: Arc<dyn FitnessStore>) -> Self {
        Self { store }
    }

    // ========================================================================
    // Health Calculations
    // ========================================================================

    /// Daily calorie and macro targets from a free-form profile
    pub fn calculate_tdee_and_macros(
        &self,
        weight_kg: f64,
        height_cm: f64,
        age: i32,
        gender: &str,
        activity_level: &str,
        goal: &str,
    ) -> MacroTargets {
        health_metrics::calculate_tdee_and_macros(
            weight_kg,
            height_cm,
            age,
            gender,
            activity_level,
            goal,
        )
    }

    pub fn calculate_bmi(&self, weight_kg: f64, height_cm: f64) -> String {
        health_metrics::bmi_summary(weight_kg, height_cm)
    }

    pub fn estimate_one_rep_max(&self, weight_kg: f64, reps: i32) -> String {
        health_metrics::one_rep_max_summary(weight_kg, reps)
    }

    // ========================================================================
    // Knowledge Lookup
    // ========================================================================

    pub async fn find_exercises_by_muscle(&self, target_muscle: &str, equipment: &str) -> StoreResult<String> {
        let exercises = self
            .store
            .find_exercises(target_muscle, equipment, EXERCISE_LOOKUP_LIMIT)
            .await?;

        if exercises.is_empty() {
            return Ok(format!("No exercises found for {} using {}.", target_muscle, equipment));
        }

        Ok(format!(
            "Here are some {} exercises for {}: {}.",
            equipment,
            target_muscle,
            join_names(exercises.iter().map(|e| e.name.as_str()))
        ))
    }

    pub async fn get_macronutrients_for_food(&self, food_name: &str, weight_grams: f64) -> StoreResult<String> {
        let Some(food) = self.store.find_food(food_name).await? else {
            return Ok(format!("Food '{}' not found in the database.", food_name));
        };

        let portion = food.portion(weight_grams);
        Ok(format!(
            "{}g of {} has approximately: {} calories, {}g protein, {}g carbs, and {}g fat.",
            weight_grams, food.name, portion.calories, portion.protein_g, portion.carbs_g, portion.fat_g
        ))
    }

    // ========================================================================
    // Logging
    // ========================================================================

    /// Resolve the exercise and append the workout in one transaction
    pub async fn log_workout(
        &self,
        user_id: i64,
        exercise_name: &str,
        sets: i32,
        reps: i32,
        weight_kg: f64,
    ) -> StoreResult<String> {
        let outcome = self
            .store
            .log_workout(NewWorkoutLog {
                user_id,
                exercise_name: exercise_name.to_string(),
                sets,
                reps,
                weight_kg,
            })
            .await?;

        match outcome {
            WorkoutLogOutcome::ExerciseNotFound => Ok(exercise_not_found(exercise_name)),
            WorkoutLogOutcome::Logged { exercise, log } => {
                debug!(user_id, exercise = %exercise.name, log_id = log.id, "Workout logged");
                Ok(format!(
                    "Successfully logged workout: {} sets of {} reps of {} at {}kg.",
                    log.sets, log.reps, exercise.name, log.weight_kg
                ))
            }
        }
    }

    pub async fn log_daily_weight(&self, user_id: i64, weight_kg: f64) -> StoreResult<String> {
        let entry = self.store.log_weight(user_id, weight_kg).await?;
        debug!(user_id, log_id = entry.id, "Weight logged");
        Ok(format!("Successfully logged today's weight as {}kg.", entry.weight_kg))
    }

    // ========================================================================
    // Progress & Substitution
    // ========================================================================

    /// Compare the first and latest logged sets of an exercise
    pub async fn get_strength_progress(&self, user_id: i64, exercise_name: &str) -> StoreResult<String> {
        let Some(exercise) = self.store.find_exercise_by_name(exercise_name).await? else {
            return Ok(exercise_not_found(exercise_name));
        };

        let history = self.store.workout_history(user_id, exercise.id).await?;
        let (first, latest) = match (history.first(), history.last()) {
            (Some(first), Some(latest)) if history.len() >= 2 => (first, latest),
            _ => {
                return Ok(format!(
                    "Not enough data to show progress for {}. Keep logging your workouts!",
                    exercise.name
                ))
            }
        };

        Ok(format!(
            "Strength progress for {}: You started at {}kg for {} reps on {}. Your latest lift was {}kg for {} reps on {}.",
            exercise.name,
            first.weight_kg,
            first.reps,
            first.logged_at.format("%Y-%m-%d"),
            latest.weight_kg,
            latest.reps,
            latest.logged_at.format("%Y-%m-%d"),
        ))
    }

    /// Same-muscle alternatives that use only the listed equipment
    pub async fn suggest_exercise_substitutions(
        &self,
        exercise_to_replace: &str,
        available_equipment: &[String],
    ) -> StoreResult<String> {
        let Some(original) = self.store.find_exercise_by_name(exercise_to_replace).await? else {
            return Ok(exercise_not_found(exercise_to_replace));
        };

        let substitutes = if available_equipment.is_empty() {
            Vec::new()
        } else {
            self.store.find_substitutes(&original, available_equipment).await?
        };

        if substitutes.is_empty() {
            return Ok(format!(
                "No substitutes found for {} with your equipment.",
                original.target_muscle
            ));
        }

        Ok(format!(
            "Here are some suitable substitutes for {} using your equipment: {}. The user should choose one.",
            original.name,
            join_names(substitutes.iter().map(|e| e.name.as_str()))
        ))
    }
}

fn exercise_not_found(name: &str) -> String {
    format!("Exercise '{}' not found.", name)
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}
