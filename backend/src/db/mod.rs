//! PostgreSQL access for FitForge
//!
//! Bringing a database up takes three separate steps:
//!
//! 1. [`connect`] opens the pool.
//! 2. [`run_migrations`] applies the embedded schema from `migrations/`.
//! 3. [`seed::seed_catalogue`] loads the exercise library, the food table
//!    and the demo user.
//!
//! The server does 1 and 2 at startup (2 is skipped in production, where a
//! migration job owns the schema). Only `fitforge-seed` does 3, so a
//! restart never touches reference rows or user logs.

pub mod seed;

use anyhow::Result;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Schema migrations compiled into the binary
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Pool sizing and connection lifetimes
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(10 * 60),
            max_lifetime: Duration::from_secs(30 * 60),
        }
    }
}

impl PoolSettings {
    /// Defaults with a different ceiling. One idle connection is kept warm
    /// unless the ceiling is zero.
    pub fn with_max_connections(max_connections: u32) -> Self {
        Self {
            max_connections,
            min_connections: max_connections.min(1),
            ..Default::default()
        }
    }
}

/// Open a pool with default settings and the given ceiling
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    connect(database_url, &PoolSettings::with_max_connections(max_connections)).await
}

/// Open a pool. Connections are checked before each checkout so a
/// restarted database does not surface as a failed tool call.
pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<PgPool> {
    let options = PgConnectOptions::from_str(database_url)?.application_name("fitforge");

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout)
        .max_lifetime(settings.max_lifetime)
        .test_before_acquire(true)
        .connect_with(options)
        .await?;

    info!(
        max = settings.max_connections,
        min = settings.min_connections,
        "Database pool ready"
    );
    Ok(pool)
}

/// Apply pending migrations. Already-applied versions are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    let known = MIGRATOR.iter().count();
    info!(migrations = known, "Applying schema migrations");
    MIGRATOR.run(pool).await?;
    info!("Schema up to date");
    Ok(())
}

/// Round-trip a trivial query; used by the readiness endpoint
pub async fn health_check(pool: &PgPool) -> sqlx::Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!(error = %e, "Database health check failed");
            e
        })
}
