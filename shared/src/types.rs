//! API request and response types

use crate::health_metrics::{ActivityLevel, BmiResult, Goal, MacroTargets};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Coaching Endpoints
// ============================================================================

/// Structured request for a combined workout and meal plan
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlanRequest {
    #[validate(range(min = 13, max = 120))]
    pub age: i32,
    #[validate(range(min = 20.0, max = 500.0))]
    pub weight_kg: f64,
    #[validate(range(min = 100.0, max = 250.0))]
    pub height_cm: f64,
    #[validate(length(min = 1, max = 32))]
    pub gender: String,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    /// Empty means bodyweight only
    #[serde(default)]
    #[validate(length(max = 20))]
    pub available_equipment: Vec<String>,
    #[validate(range(min = 1, max = 7))]
    pub days_per_week: i32,
}

/// Generated plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub plan: String,
}

/// Coaching focus of a chat conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    Diet,
    Exercise,
    #[default]
    Both,
}

impl ChatMode {
    /// Anything other than `diet` or `exercise` is the combined coach
    pub fn from_request(mode: Option<&str>) -> Self {
        match mode.map(|m| m.trim().to_ascii_lowercase()).as_deref() {
            Some("diet") => ChatMode::Diet,
            Some("exercise") => ChatMode::Exercise,
            _ => ChatMode::Both,
        }
    }
}

/// Free-form chat message
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    /// Account the coach should log against
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Chat reply with the session to continue the conversation in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

// ============================================================================
// Tool Endpoints
// ============================================================================

/// Result of a direct tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocationResponse {
    pub tool: String,
    pub result: serde_json::Value,
}

// ============================================================================
// User and Profile Types
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 255))]
    pub email: String,
}

/// User account response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Profile create-or-replace request
///
/// Enumerations arrive as strings so unknown values can be reported with the
/// field's display label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub age: i32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub gender: String,
    pub activity_level: String,
    pub goal: String,
}

/// Profile with derived metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user_id: i64,
    pub age: i32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub gender: String,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub bmi: BmiResult,
    pub daily_targets: MacroTargets,
}
