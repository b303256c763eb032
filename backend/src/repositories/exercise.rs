//! Exercise and workout log repository for database operations

use chrono::{DateTime, Utc};
use fitforge_shared::models::{Exercise, WorkoutLog};
use sqlx::PgConnection;

// ============================================================================
// Exercise Library
// ============================================================================

/// Exercise record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseRecord {
    pub id: i64,
    pub name: String,
    pub target_muscle: String,
    pub equipment: String,
    pub instructions: Option<String>,
    pub video_url: Option<String>,
}

impl From<ExerciseRecord> for Exercise {
    fn from(r: ExerciseRecord) -> Self {
        Exercise {
            id: r.id,
            name: r.name,
            target_muscle: r.target_muscle,
            equipment: r.equipment,
            instructions: r.instructions,
            video_url: r.video_url,
        }
    }
}

/// Exercise repository
pub struct ExerciseRepository;

impl ExerciseRepository {
    /// Insert a library exercise unless one with the same name exists (for seeding)
    pub async fn insert_if_missing(
        conn: &mut PgConnection,
        name: &str,
        target_muscle: &str,
        equipment: &str,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO exercises (name, target_muscle, equipment)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(name)
        .bind(target_muscle)
        .bind(equipment)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Find an exercise by name, ignoring case
    pub async fn find_by_name(conn: &mut PgConnection, name: &str) -> sqlx::Result<Option<ExerciseRecord>> {
        sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, name, target_muscle, equipment, instructions, video_url
            FROM exercises
            WHERE LOWER(name) = LOWER($1)
            "#,
        )
        .bind(name)
        .fetch_optional(conn)
        .await
    }

    /// Exercises for a muscle whose equipment list mentions `equipment`
    pub async fn search_by_muscle_and_equipment(
        conn: &mut PgConnection,
        target_muscle: &str,
        equipment: &str,
        limit: i64,
    ) -> sqlx::Result<Vec<ExerciseRecord>> {
        sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, name, target_muscle, equipment, instructions, video_url
            FROM exercises
            WHERE LOWER(target_muscle) = LOWER($1)
              AND POSITION(LOWER($2) IN LOWER(equipment)) > 0
            ORDER BY id
            LIMIT $3
            "#,
        )
        .bind(target_muscle)
        .bind(equipment)
        .bind(limit)
        .fetch_all(conn)
        .await
    }

    /// Same-muscle exercises whose equipment exactly matches one of the given items
    pub async fn find_substitutes(
        conn: &mut PgConnection,
        original_id: i64,
        target_muscle: &str,
        equipment: &[String],
    ) -> sqlx::Result<Vec<ExerciseRecord>> {
        let lowered: Vec<String> = equipment.iter().map(|e| e.trim().to_lowercase()).collect();

        sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, name, target_muscle, equipment, instructions, video_url
            FROM exercises
            WHERE LOWER(target_muscle) = LOWER($1)
              AND LOWER(equipment) = ANY($2)
              AND id <> $3
            ORDER BY id
            "#,
        )
        .bind(target_muscle)
        .bind(&lowered)
        .bind(original_id)
        .fetch_all(conn)
        .await
    }
}

// ============================================================================
// Workout Logs
// ============================================================================

/// Workout log record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutLogRecord {
    pub id: i64,
    pub user_id: i64,
    pub exercise_id: i64,
    pub sets: i32,
    pub reps: i32,
    pub weight_kg: f64,
    pub logged_at: DateTime<Utc>,
}

impl From<WorkoutLogRecord> for WorkoutLog {
    fn from(r: WorkoutLogRecord) -> Self {
        WorkoutLog {
            id: r.id,
            user_id: r.user_id,
            exercise_id: r.exercise_id,
            sets: r.sets,
            reps: r.reps,
            weight_kg: r.weight_kg,
            logged_at: r.logged_at,
        }
    }
}

/// Input for creating a workout log
#[derive(Debug, Clone)]
pub struct CreateWorkoutLog {
    pub user_id: i64,
    pub exercise_id: i64,
    pub sets: i32,
    pub reps: i32,
    pub weight_kg: f64,
}

/// Workout log repository. Logs are append-only; there is no update or delete.
pub struct WorkoutLogRepository;

impl WorkoutLogRepository {
    /// Append a workout log stamped with the current time
    pub async fn create(conn: &mut PgConnection, input: CreateWorkoutLog) -> sqlx::Result<WorkoutLogRecord> {
        sqlx::query_as::<_, WorkoutLogRecord>(
            r#"
            INSERT INTO workout_logs (user_id, exercise_id, sets, reps, weight_kg)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, exercise_id, sets, reps, weight_kg, logged_at
            "#,
        )
        .bind(input.user_id)
        .bind(input.exercise_id)
        .bind(input.sets)
        .bind(input.reps)
        .bind(input.weight_kg)
        .fetch_one(conn)
        .await
    }

    /// All logs for a user and exercise, oldest first
    pub async fn history(
        conn: &mut PgConnection,
        user_id: i64,
        exercise_id: i64,
    ) -> sqlx::Result<Vec<WorkoutLogRecord>> {
        sqlx::query_as::<_, WorkoutLogRecord>(
            r#"
            SELECT id, user_id, exercise_id, sets, reps, weight_kg, logged_at
            FROM workout_logs
            WHERE user_id = $1 AND exercise_id = $2
            ORDER BY logged_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(exercise_id)
        .fetch_all(conn)
        .await
    }
}
