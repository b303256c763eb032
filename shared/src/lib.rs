//! FitForge Shared Library
//!
//! This crate contains the calculation toolkit, domain models, API types and
//! validation used across the backend and WASM modules.

pub mod errors;
pub mod health_metrics;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use health_metrics::*;
pub use types::*;

pub use models::{Exercise, Food, PortionNutrition, User, UserProfile, WeightLog, WorkoutLog};
