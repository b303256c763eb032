//! Health check and metrics endpoints
//!
//! Provides Kubernetes-compatible health check endpoints:
//! - /health - Basic health check
//! - /health/ready - Readiness check (checks the store)
//! - /health/live - Liveness check (always returns OK if server is running)
//! - /metrics - Prometheus exposition, when a recorder is installed

use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

/// Individual health checks
#[derive(Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
}

/// Status of an individual check
#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}

/// Readiness check - checks if the service is ready to accept traffic
/// Returns 503 if the store is unreachable
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = match state.store().health_check().await {
        Ok(_) => CheckStatus {
            status: "healthy".to_string(),
            message: None,
        },
        Err(e) => CheckStatus {
            status: "unhealthy".to_string(),
            message: Some(e.to_string()),
        },
    };

    let is_healthy = db_check.status == "healthy";

    let response = HealthResponse {
        status: if is_healthy { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(HealthChecks { database: db_check }),
    };

    if is_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Liveness check - checks if the service is alive
/// Always returns OK if the server is running
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}

/// Prometheus text exposition
pub async fn metrics(State(state): State<AppState>) -> Result<String, ApiError> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or_else(|| ApiError::NotFound("Metrics recorder is not installed".to_string()))
}
