//! Error types for the FitForge domain

use thiserror::Error;

/// Errors raised when parsing or validating domain input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid activity level '{0}'. Must be one of: sedentary, lightly_active, moderately_active, very_active")]
    InvalidActivityLevel(String),

    #[error("Invalid goal '{0}'. Must be one of: lose_fat, build_muscle, maintain")]
    InvalidGoal(String),

    #[error("{field}: {message}")]
    Validation { field: String, message: String },
}

impl DomainError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
