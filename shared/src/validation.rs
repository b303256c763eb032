//! Input validation functions
//!
//! This module provides validation utilities for user input.
//! Request bodies also derive `validator::Validate` for range checks; the
//! functions here cover rules that need custom logic.

use crate::errors::DomainError;

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    let email_regex = regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map_err(|e| format!("Email pattern failed to compile: {}", e))?;
    if !email_regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate height value (in cm)
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    if height_cm.is_nan() || height_cm.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if height_cm < 100.0 {
        return Err("Height must be at least 100 cm".to_string());
    }
    if height_cm > 250.0 {
        return Err("Height must be at most 250 cm".to_string());
    }
    Ok(())
}

/// Validate age in whole years
pub fn validate_age(age: i32) -> Result<(), String> {
    if age < 13 {
        return Err("Age must be at least 13 years".to_string());
    }
    if age > 120 {
        return Err("Age cannot exceed 120 years".to_string());
    }
    Ok(())
}

/// Validate a free-form gender value
pub fn validate_gender(gender: &str) -> Result<(), String> {
    let trimmed = gender.trim();
    if trimmed.is_empty() {
        return Err("Gender cannot be empty".to_string());
    }
    if trimmed.len() > 32 {
        return Err("Gender too long".to_string());
    }
    Ok(())
}

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "email" => "Email",
        "age" => "Age",
        "weight_kg" => "Current Weight",
        "height_cm" => "Height",
        "gender" => "Gender",
        "activity_level" => "Activity Level",
        "goal" => "Goal",
        _ => field_name,
    }
}

/// Attach the field's display label to a validation failure
pub fn labeled(field: &str, result: Result<(), String>) -> Result<(), DomainError> {
    result.map_err(|message| DomainError::validation(get_field_display_label(field), message))
}
