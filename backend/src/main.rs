//! FitForge Backend
//!
//! An agentic fitness and nutrition coach.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! - Routes: HTTP request handling and routing
//! - Services: Coaching agent, tool registry and profile logic
//! - Repositories: Knowledge base and training logs behind `FitnessStore`
//! - Database: PostgreSQL with SQLx

use anyhow::Result;
use fitforge_backend::{
    config, db,
    repositories::PgStore,
    routes,
    services::OllamaClient,
    state::AppState,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        model = %config.ai.model,
        "Starting FitForge Backend"
    );

    // Validate production configuration
    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    let metrics_handle = PrometheusBuilder::new().install_recorder()?;

    // Create database pool
    info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database.url, config.database.max_connections).await?;

    // Run migrations (skip in production if using separate migration job)
    if !config::AppConfig::is_production() {
        info!("Running database migrations...");
        db::run_migrations(&db_pool).await?;
    }

    let llm = OllamaClient::new(
        &config.ai.ollama_url,
        &config.ai.model,
        Duration::from_secs(config.ai.request_timeout_secs),
    )?;
    info!(url = %config.ai.ollama_url, model = llm.model(), "Model client ready");

    // Create application state
    let state = AppState::new(Arc::new(PgStore::new(db_pool)), Arc::new(llm), config.clone())
        .with_metrics(metrics_handle);

    // Build application
    let app = routes::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "fitforge_backend=info,tower_http=info".into()
        } else {
            "fitforge_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Validate configuration for production deployment
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.ai.model.trim().is_empty() {
        errors.push("AI model name must be set");
    }

    if config.ai.max_iterations == 0 {
        errors.push("AI max_iterations must be at least 1");
    }

    // Check database URL is not localhost in production
    if config.database.url.contains("localhost") || config.database.url.contains("127.0.0.1") {
        warn!("Database URL contains localhost - ensure this is intentional for production");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
