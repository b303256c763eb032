//! PostgreSQL-backed [`FitnessStore`]

use super::{
    classify_db_error, CreateWorkoutLog, ExerciseRepository, FitnessStore, FoodRepository,
    NewWorkoutLog, StoreResult, UserRepository, WeightLogRepository, WorkoutLogOutcome,
    WorkoutLogRepository,
};
use async_trait::async_trait;
use fitforge_shared::models::{Exercise, Food, User, UserProfile, WeightLog, WorkoutLog};
use sqlx::PgPool;
use tracing::debug;

/// Store over a shared connection pool.
///
/// Each call acquires its own connection (or transaction) and returns it to
/// the pool when the call's future completes, on success or error.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl FitnessStore for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        crate::db::health_check(&self.pool).await?;
        Ok(())
    }

    async fn find_exercise_by_name(&self, name: &str) -> StoreResult<Option<Exercise>> {
        let mut conn = self.pool.acquire().await?;
        let record = ExerciseRepository::find_by_name(&mut *conn, name).await?;
        Ok(record.map(Exercise::from))
    }

    async fn find_exercises(
        &self,
        target_muscle: &str,
        equipment: &str,
        limit: i64,
    ) -> StoreResult<Vec<Exercise>> {
        let mut conn = self.pool.acquire().await?;
        let records =
            ExerciseRepository::search_by_muscle_and_equipment(&mut *conn, target_muscle, equipment, limit)
                .await?;
        Ok(records.into_iter().map(Exercise::from).collect())
    }

    async fn find_substitutes(
        &self,
        original: &Exercise,
        equipment: &[String],
    ) -> StoreResult<Vec<Exercise>> {
        let mut conn = self.pool.acquire().await?;
        let records =
            ExerciseRepository::find_substitutes(&mut *conn, original.id, &original.target_muscle, equipment)
                .await?;
        Ok(records.into_iter().map(Exercise::from).collect())
    }

    async fn find_food(&self, name_fragment: &str) -> StoreResult<Option<Food>> {
        let mut conn = self.pool.acquire().await?;
        let record = FoodRepository::find_by_name_fragment(&mut *conn, name_fragment).await?;
        Ok(record.map(Food::from))
    }

    async fn log_workout(&self, new_log: NewWorkoutLog) -> StoreResult<WorkoutLogOutcome> {
        let mut tx = self.pool.begin().await?;

        let Some(record) = ExerciseRepository::find_by_name(&mut *tx, &new_log.exercise_name).await? else {
            debug!(exercise = %new_log.exercise_name, "Exercise not found, rolling back");
            tx.rollback().await?;
            return Ok(WorkoutLogOutcome::ExerciseNotFound);
        };
        let exercise = Exercise::from(record);

        let log = WorkoutLogRepository::create(
            &mut *tx,
            CreateWorkoutLog {
                user_id: new_log.user_id,
                exercise_id: exercise.id,
                sets: new_log.sets,
                reps: new_log.reps,
                weight_kg: new_log.weight_kg,
            },
        )
        .await
        .map_err(|e| classify_db_error(e, &format!("user {}", new_log.user_id)))?;

        tx.commit().await?;

        Ok(WorkoutLogOutcome::Logged {
            exercise,
            log: log.into(),
        })
    }

    async fn workout_history(&self, user_id: i64, exercise_id: i64) -> StoreResult<Vec<WorkoutLog>> {
        let mut conn = self.pool.acquire().await?;
        let records = WorkoutLogRepository::history(&mut *conn, user_id, exercise_id).await?;
        Ok(records.into_iter().map(WorkoutLog::from).collect())
    }

    async fn log_weight(&self, user_id: i64, weight_kg: f64) -> StoreResult<WeightLog> {
        let mut conn = self.pool.acquire().await?;
        let record = WeightLogRepository::create(&mut *conn, user_id, weight_kg)
            .await
            .map_err(|e| classify_db_error(e, &format!("user {}", user_id)))?;
        Ok(record.into())
    }

    async fn create_user(&self, email: &str) -> StoreResult<User> {
        let mut conn = self.pool.acquire().await?;
        let record = UserRepository::create(&mut *conn, email)
            .await
            .map_err(|e| classify_db_error(e, &format!("email {} is already registered", email)))?;
        Ok(record.into())
    }

    async fn find_user(&self, user_id: i64) -> StoreResult<Option<User>> {
        let mut conn = self.pool.acquire().await?;
        let record = UserRepository::find_by_id(&mut *conn, user_id).await?;
        Ok(record.map(User::from))
    }

    async fn get_profile(&self, user_id: i64) -> StoreResult<Option<UserProfile>> {
        let mut conn = self.pool.acquire().await?;
        UserRepository::get_profile(&mut *conn, user_id)
            .await?
            .map(UserProfile::try_from)
            .transpose()
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> StoreResult<UserProfile> {
        let mut conn = self.pool.acquire().await?;
        let record = UserRepository::upsert_profile(&mut *conn, profile)
            .await
            .map_err(|e| classify_db_error(e, &format!("user {}", profile.user_id)))?;
        UserProfile::try_from(record)
    }
}
