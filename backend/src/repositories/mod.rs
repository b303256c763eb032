//! Database repositories
//!
//! Provides the data access layer. Handlers and services talk to the
//! [`FitnessStore`] trait; [`PgStore`] backs it with PostgreSQL and
//! [`MemoryStore`] with in-process tables for tests and demos.

pub mod exercise;
pub mod memory;
pub mod nutrition;
pub mod pg_store;
pub mod user;
pub mod weight;

use async_trait::async_trait;
use fitforge_shared::models::{Exercise, Food, User, UserProfile, WeightLog, WorkoutLog};
use thiserror::Error;

pub use exercise::{CreateWorkoutLog, ExerciseRepository, WorkoutLogRepository};
pub use memory::MemoryStore;
pub use nutrition::FoodRepository;
pub use pg_store::PgStore;
pub use user::UserRepository;
pub use weight::WeightLogRepository;

/// Store-level failures. These are never turned into tool text; they
/// propagate to the caller.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Referenced row does not exist: {0}")]
    MissingReference(String),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Workout to append, addressed by exercise name
#[derive(Debug, Clone)]
pub struct NewWorkoutLog {
    pub user_id: i64,
    pub exercise_name: String,
    pub sets: i32,
    pub reps: i32,
    pub weight_kg: f64,
}

/// Result of resolving an exercise and appending a workout in one unit of work
#[derive(Debug, Clone)]
pub enum WorkoutLogOutcome {
    Logged { exercise: Exercise, log: WorkoutLog },
    ExerciseNotFound,
}

/// Relational store of the knowledge base and training logs
///
/// Every method is one unit of work: implementations acquire their
/// connection (or transaction) inside the call and release it on return.
#[async_trait]
pub trait FitnessStore: Send + Sync {
    /// Round-trip to the backing store
    async fn health_check(&self) -> StoreResult<()>;

    /// Case-insensitive exact match on exercise name
    async fn find_exercise_by_name(&self, name: &str) -> StoreResult<Option<Exercise>>;

    /// Exact (case-insensitive) muscle and substring (case-insensitive) equipment match
    async fn find_exercises(
        &self,
        target_muscle: &str,
        equipment: &str,
        limit: i64,
    ) -> StoreResult<Vec<Exercise>>;

    /// Other exercises for the same muscle whose equipment is one of `equipment`
    async fn find_substitutes(
        &self,
        original: &Exercise,
        equipment: &[String],
    ) -> StoreResult<Vec<Exercise>>;

    /// First food whose name contains `name_fragment`, case-insensitively
    async fn find_food(&self, name_fragment: &str) -> StoreResult<Option<Food>>;

    /// Resolve the exercise and append the log atomically
    async fn log_workout(&self, new_log: NewWorkoutLog) -> StoreResult<WorkoutLogOutcome>;

    /// All logs for a user and exercise, oldest first
    async fn workout_history(&self, user_id: i64, exercise_id: i64) -> StoreResult<Vec<WorkoutLog>>;

    async fn log_weight(&self, user_id: i64, weight_kg: f64) -> StoreResult<WeightLog>;

    async fn create_user(&self, email: &str) -> StoreResult<User>;

    async fn find_user(&self, user_id: i64) -> StoreResult<Option<User>>;

    async fn get_profile(&self, user_id: i64) -> StoreResult<Option<UserProfile>>;

    /// Create or replace the user's profile
    async fn upsert_profile(&self, profile: &UserProfile) -> StoreResult<UserProfile>;
}

/// Classify constraint violations raised by PostgreSQL
pub(crate) fn classify_db_error(err: sqlx::Error, context: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Conflict(context.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::MissingReference(context.to_string());
        }
    }
    StoreError::Database(err)
}
