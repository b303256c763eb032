//! User and profile repository for database operations

use super::StoreError;
use chrono::{DateTime, Utc};
use fitforge_shared::health_metrics::{ActivityLevel, Goal};
use fitforge_shared::models::{User, UserProfile};
use sqlx::PgConnection;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        User {
            id: r.id,
            email: r.email,
            created_at: r.created_at,
        }
    }
}

/// Profile record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRecord {
    pub user_id: i64,
    pub age: i32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub gender: String,
    pub activity_level: String,
    pub goal: String,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRecord> for UserProfile {
    type Error = StoreError;

    fn try_from(r: ProfileRecord) -> Result<Self, Self::Error> {
        let activity_level = r
            .activity_level
            .parse::<ActivityLevel>()
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;
        let goal = r
            .goal
            .parse::<Goal>()
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;

        Ok(UserProfile {
            user_id: r.user_id,
            age: r.age,
            weight_kg: r.weight_kg,
            height_cm: r.height_cm,
            gender: r.gender,
            activity_level,
            goal,
        })
    }
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(conn: &mut PgConnection, email: &str) -> sqlx::Result<UserRecord> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email)
            VALUES ($1)
            RETURNING id, email, created_at
            "#,
        )
        .bind(email)
        .fetch_one(conn)
        .await
    }

    /// Create a user unless the email is taken (for seeding)
    pub async fn insert_if_missing(conn: &mut PgConnection, email: &str) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (email)
            VALUES ($1)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(email)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Find user by ID
    pub async fn find_by_id(conn: &mut PgConnection, id: i64) -> sqlx::Result<Option<UserRecord>> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Get a user's profile
    pub async fn get_profile(conn: &mut PgConnection, user_id: i64) -> sqlx::Result<Option<ProfileRecord>> {
        sqlx::query_as::<_, ProfileRecord>(
            r#"
            SELECT user_id, age, weight_kg, height_cm, gender, activity_level, goal, updated_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(conn)
        .await
    }

    /// Create or replace a user's profile
    pub async fn upsert_profile(conn: &mut PgConnection, profile: &UserProfile) -> sqlx::Result<ProfileRecord> {
        sqlx::query_as::<_, ProfileRecord>(
            r#"
            INSERT INTO user_profiles (user_id, age, weight_kg, height_cm, gender, activity_level, goal)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                age = EXCLUDED.age,
                weight_kg = EXCLUDED.weight_kg,
                height_cm = EXCLUDED.height_cm,
                gender = EXCLUDED.gender,
                activity_level = EXCLUDED.activity_level,
                goal = EXCLUDED.goal,
                updated_at = NOW()
            RETURNING user_id, age, weight_kg, height_cm, gender, activity_level, goal, updated_at
            "#,
        )
        .bind(profile.user_id)
        .bind(profile.age)
        .bind(profile.weight_kg)
        .bind(profile.height_cm)
        .bind(&profile.gender)
        .bind(profile.activity_level.as_str())
        .bind(profile.goal.as_str())
        .fetch_one(conn)
        .await
    }
}
