//! Body weight repository for database operations

use chrono::{DateTime, Utc};
use fitforge_shared::models::WeightLog;
use sqlx::PgConnection;

/// Weight log record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WeightLogRecord {
    pub id: i64,
    pub user_id: i64,
    pub weight_kg: f64,
    pub logged_at: DateTime<Utc>,
}

impl From<WeightLogRecord> for WeightLog {
    fn from(r: WeightLogRecord) -> Self {
        WeightLog {
            id: r.id,
            user_id: r.user_id,
            weight_kg: r.weight_kg,
            logged_at: r.logged_at,
        }
    }
}

/// Weight log repository. Entries are append-only.
pub struct WeightLogRepository;

impl WeightLogRepository {
    /// Append a weight entry stamped with the current time
    pub async fn create(conn: &mut PgConnection, user_id: i64, weight_kg: f64) -> sqlx::Result<WeightLogRecord> {
        sqlx::query_as::<_, WeightLogRecord>(
            r#"
            INSERT INTO weight_logs (user_id, weight_kg)
            VALUES ($1, $2)
            RETURNING id, user_id, weight_kg, logged_at
            "#,
        )
        .bind(user_id)
        .bind(weight_kg)
        .fetch_one(conn)
        .await
    }
}
