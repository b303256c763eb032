//! Route definitions for the FitForge API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod assistant;
mod health;
mod pages;
mod tools;
mod users;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config().server.request_timeout_secs);
    let static_dir = format!("{}/static", state.config().frontend.dir);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(health::metrics))
        .route("/generate-plan", post(assistant::generate_plan))
        .route("/chat", post(assistant::chat))
        .nest("/api/v1", api_routes())
        .route("/", get(pages::index))
        .route("/:page", get(pages::page))
        .nest_service("/static", ServeDir::new(static_dir))
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "FitForge API v1" }))
        .nest("/tools", tools::tool_routes())
        .nest("/users", users::user_routes())
}
