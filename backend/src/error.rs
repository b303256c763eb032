//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use crate::repositories::StoreError;
use crate::services::agent::AgentError;
use crate::services::tools::ToolError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fitforge_shared::DomainError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream model error: {0}")]
    Upstream(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Store error")]
    Store(StoreError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: None,
        }
    }

    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::MissingReference(msg) => ApiError::NotFound(msg),
            other => ApiError::Store(other),
        }
    }
}

impl From<ToolError> for ApiError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::UnknownTool(name) => ApiError::NotFound(format!("Unknown tool '{}'", name)),
            ToolError::InvalidArguments { tool, message } => {
                ApiError::BadRequest(format!("Invalid arguments for '{}': {}", tool, message))
            }
            ToolError::Store(err) => ApiError::from(err),
        }
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Upstream(msg) => ApiError::Upstream(msg),
            AgentError::Tool(err) => ApiError::Store(err),
            AgentError::InvalidResponse(msg) => ApiError::Upstream(msg),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { field, message } => ApiError::Validation {
                message: format!("{}: {}", field, message),
                field: Some(field),
            },
            DomainError::InvalidActivityLevel(_) => ApiError::field("activity_level", err.to_string()),
            DomainError::InvalidGoal(_) => ApiError::field("goal", err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort_unstable();
        match fields.first() {
            Some(field) => ApiError::field(field, format!("Invalid value for {}", field)),
            None => ApiError::validation(errors.to_string()),
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match self {
            ApiError::Validation { message, field } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message, field)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::Upstream(msg) => {
                error!("Model server error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The model server could not complete the request".to_string(),
                    None,
                )
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::Store(err) => {
                error!("Store error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
