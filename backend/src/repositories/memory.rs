//! In-process [`FitnessStore`] for tests and database-less demos
//!
//! Mirrors the PostgreSQL semantics the coach relies on: case-insensitive
//! lookups, unique emails, user references on logs and `(logged_at, id)`
//! ordering of history.

use super::{FitnessStore, NewWorkoutLog, StoreError, StoreResult, WorkoutLogOutcome};
use crate::db::seed::{DEMO_USER_EMAIL, EXERCISES, FOODS};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fitforge_shared::models::{Exercise, Food, User, UserProfile, WeightLog, WorkoutLog};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    profiles: HashMap<i64, UserProfile>,
    exercises: Vec<Exercise>,
    foods: Vec<Food>,
    workout_logs: Vec<WorkoutLog>,
    weight_logs: Vec<WeightLog>,
}

impl Tables {
    fn exercise_by_name(&self, name: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    fn require_user(&self, user_id: i64) -> StoreResult<()> {
        if self.users.iter().any(|u| u.id == user_id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference(format!("user {}", user_id)))
        }
    }
}

/// Store holding every table in memory behind one lock
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the exercise library, food table and demo user (id 1)
    pub fn with_catalogue() -> Self {
        let exercises = EXERCISES
            .iter()
            .zip(1..)
            .map(|(e, id)| Exercise {
                id,
                name: e.name.to_string(),
                target_muscle: e.target_muscle.to_string(),
                equipment: e.equipment.to_string(),
                instructions: None,
                video_url: None,
            })
            .collect();

        let foods = FOODS
            .iter()
            .zip(1..)
            .map(|(f, id)| Food {
                id,
                name: f.name.to_string(),
                calories_per_100g: f.calories,
                protein_g_per_100g: f.protein_g,
                carbs_g_per_100g: f.carbs_g,
                fat_g_per_100g: f.fat_g,
            })
            .collect();

        let users = vec![User {
            id: 1,
            email: DEMO_USER_EMAIL.to_string(),
            created_at: Utc::now(),
        }];

        Self {
            tables: RwLock::new(Tables {
                users,
                exercises,
                foods,
                ..Default::default()
            }),
        }
    }

    /// Append a workout log with an explicit timestamp, e.g. to backfill history
    pub async fn insert_workout_log_at(
        &self,
        user_id: i64,
        exercise_id: i64,
        sets: i32,
        reps: i32,
        weight_kg: f64,
        logged_at: DateTime<Utc>,
    ) -> StoreResult<WorkoutLog> {
        let mut tables = self.tables.write().await;
        tables.require_user(user_id)?;
        if !tables.exercises.iter().any(|e| e.id == exercise_id) {
            return Err(StoreError::MissingReference(format!("exercise {}", exercise_id)));
        }

        let log = WorkoutLog {
            id: tables.workout_logs.len() as i64 + 1,
            user_id,
            exercise_id,
            sets,
            reps,
            weight_kg,
            logged_at,
        };
        tables.workout_logs.push(log.clone());
        Ok(log)
    }

    /// Number of workout logs across all users
    pub async fn workout_log_count(&self) -> usize {
        self.tables.read().await.workout_logs.len()
    }

    /// Weight entries for a user in insertion order
    pub async fn weight_logs(&self, user_id: i64) -> Vec<WeightLog> {
        self.tables
            .read()
            .await
            .weight_logs
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl FitnessStore for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_exercise_by_name(&self, name: &str) -> StoreResult<Option<Exercise>> {
        Ok(self.tables.read().await.exercise_by_name(name).cloned())
    }

    async fn find_exercises(
        &self,
        target_muscle: &str,
        equipment: &str,
        limit: i64,
    ) -> StoreResult<Vec<Exercise>> {
        let equipment = equipment.to_lowercase();
        let tables = self.tables.read().await;

        let mut found: Vec<Exercise> = tables
            .exercises
            .iter()
            .filter(|e| e.target_muscle.eq_ignore_ascii_case(target_muscle))
            .filter(|e| e.equipment.to_lowercase().contains(&equipment))
            .cloned()
            .collect();
        found.sort_by_key(|e| e.id);
        found.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(found)
    }

    async fn find_substitutes(
        &self,
        original: &Exercise,
        equipment: &[String],
    ) -> StoreResult<Vec<Exercise>> {
        let tables = self.tables.read().await;

        let mut found: Vec<Exercise> = tables
            .exercises
            .iter()
            .filter(|e| e.id != original.id)
            .filter(|e| e.target_muscle.eq_ignore_ascii_case(&original.target_muscle))
            .filter(|e| equipment.iter().any(|item| e.equipment.eq_ignore_ascii_case(item.trim())))
            .cloned()
            .collect();
        found.sort_by_key(|e| e.id);
        Ok(found)
    }

    async fn find_food(&self, name_fragment: &str) -> StoreResult<Option<Food>> {
        let fragment = name_fragment.to_lowercase();
        let tables = self.tables.read().await;

        Ok(tables
            .foods
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&fragment))
            .min_by_key(|f| f.id)
            .cloned())
    }

    async fn log_workout(&self, new_log: NewWorkoutLog) -> StoreResult<WorkoutLogOutcome> {
        let mut tables = self.tables.write().await;

        let Some(exercise) = tables.exercise_by_name(&new_log.exercise_name).cloned() else {
            return Ok(WorkoutLogOutcome::ExerciseNotFound);
        };
        tables.require_user(new_log.user_id)?;

        let log = WorkoutLog {
            id: tables.workout_logs.len() as i64 + 1,
            user_id: new_log.user_id,
            exercise_id: exercise.id,
            sets: new_log.sets,
            reps: new_log.reps,
            weight_kg: new_log.weight_kg,
            logged_at: Utc::now(),
        };
        tables.workout_logs.push(log.clone());

        Ok(WorkoutLogOutcome::Logged { exercise, log })
    }

    async fn workout_history(&self, user_id: i64, exercise_id: i64) -> StoreResult<Vec<WorkoutLog>> {
        let tables = self.tables.read().await;

        let mut history: Vec<WorkoutLog> = tables
            .workout_logs
            .iter()
            .filter(|l| l.user_id == user_id && l.exercise_id == exercise_id)
            .cloned()
            .collect();
        history.sort_by(|a, b| a.logged_at.cmp(&b.logged_at).then(a.id.cmp(&b.id)));
        Ok(history)
    }

    async fn log_weight(&self, user_id: i64, weight_kg: f64) -> StoreResult<WeightLog> {
        let mut tables = self.tables.write().await;
        tables.require_user(user_id)?;

        let entry = WeightLog {
            id: tables.weight_logs.len() as i64 + 1,
            user_id,
            weight_kg,
            logged_at: Utc::now(),
        };
        tables.weight_logs.push(entry.clone());
        Ok(entry)
    }

    async fn create_user(&self, email: &str) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(StoreError::Conflict(format!("email {} is already registered", email)));
        }

        let user = User {
            id: tables.users.len() as i64 + 1,
            email: email.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, user_id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn get_profile(&self, user_id: i64) -> StoreResult<Option<UserProfile>> {
        Ok(self.tables.read().await.profiles.get(&user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> StoreResult<UserProfile> {
        let mut tables = self.tables.write().await;
        tables.require_user(profile.user_id)?;
        tables.profiles.insert(profile.user_id, profile.clone());
        Ok(profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tokio_test::{assert_err, assert_ok};

    fn squat_log(user_id: i64) -> NewWorkoutLog {
        NewWorkoutLog {
            user_id,
            exercise_name: "barbell squat".to_string(),
            sets: 3,
            reps: 5,
            weight_kg: 100.0,
        }
    }

    #[tokio::test]
    async fn test_catalogue_is_loaded() {
        let store = MemoryStore::with_catalogue();
        let squat = store.find_exercise_by_name("BARBELL SQUAT").await.unwrap().unwrap();
        assert_eq!(squat.name, "Barbell Squat");
        assert!(store.find_user(1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_find_exercises_limits_and_orders() {
        let store = MemoryStore::with_catalogue();
        let found = store.find_exercises("chest", "dumbbell", 5).await.unwrap();
        let names: Vec<_> = found.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Dumbbell Bench Press", "Incline Dumbbell Press"]);

        let limited = store.find_exercises("Legs", "", 2).await.unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn test_food_lookup_picks_first_in_catalogue_order() {
        let store = MemoryStore::with_catalogue();
        let rice = store.find_food("RICE").await.unwrap().unwrap();
        assert_eq!(rice.name, "White Rice (Cooked)");
        assert!(store.find_food("unicorn").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exercise_search_keeps_catalogue_order() {
        let store = MemoryStore::with_catalogue();
        let names: Vec<String> = store
            .find_exercises("Legs", "", 5)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(
            names,
            ["Barbell Squat", "Dumbbell Lunge", "Leg Press", "Romanian Deadlift", "Goblet Squat"]
        );
    }

    #[tokio::test]
    async fn test_log_workout_unknown_exercise_writes_nothing() {
        let store = MemoryStore::with_catalogue();
        let mut log = squat_log(1);
        log.exercise_name = "Moon Squat".to_string();

        let outcome = store.log_workout(log).await.unwrap();
        assert!(matches!(outcome, WorkoutLogOutcome::ExerciseNotFound));
        assert_eq!(store.workout_log_count().await, 0);
    }

    #[tokio::test]
    async fn test_log_workout_requires_user() {
        let store = MemoryStore::with_catalogue();
        let result = store.log_workout(squat_log(99)).await;
        assert!(matches!(result, Err(StoreError::MissingReference(_))));
        assert_eq!(store.workout_log_count().await, 0);
    }

    #[tokio::test]
    async fn test_history_is_ordered_by_time() {
        let store = MemoryStore::with_catalogue();
        let now = Utc::now();
        let squat = store.find_exercise_by_name("Barbell Squat").await.unwrap().unwrap();

        assert_ok!(store.insert_workout_log_at(1, squat.id, 3, 5, 110.0, now).await);
        assert_ok!(
            store
                .insert_workout_log_at(1, squat.id, 3, 5, 100.0, now - Duration::days(7))
                .await
        );

        let history = store.workout_history(1, squat.id).await.unwrap();
        assert_eq!(history[0].weight_kg, 100.0);
        assert_eq!(history[1].weight_kg, 110.0);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        assert_ok!(store.create_user("a@example.com").await);
        let result = store.create_user("A@EXAMPLE.COM").await;
        assert!(matches!(assert_err!(result), StoreError::Conflict(_)));
    }
}
