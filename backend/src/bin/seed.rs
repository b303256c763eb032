//! Seed the FitForge knowledge base
//!
//! Usage: `fitforge-seed [--reset]`
//!
//! Without `--reset` the seeder only inserts rows that are missing, so it
//! is safe to run repeatedly. `--reset` truncates catalogue, users and logs
//! before seeding.

use anyhow::Result;
use clap::Parser;
use fitforge_backend::{config::AppConfig, db};
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "fitforge-seed",
    about = "FitForge catalogue seeder",
    long_about = "Apply migrations, then load the exercise library, food table and demo user"
)]
struct SeedArgs {
    /// Truncate catalogue, users and logs before seeding
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitforge_backend=info,sqlx=warn".into()),
        )
        .init();

    let config = AppConfig::load()?;

    info!(reset = args.reset, "Connecting to database...");
    let pool = db::create_pool(&config.database.url, 2).await?;
    db::run_migrations(&pool).await?;

    let report = db::seed::seed_catalogue(&pool, args.reset).await?;
    println!(
        "Seeded {} exercises, {} foods, {} users",
        report.exercises, report.foods, report.users
    );

    Ok(())
}
