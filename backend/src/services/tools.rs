//! Tool registry
//!
//! Describes the toolkit to a model in the OpenAI/Ollama function-calling
//! shape and dispatches named invocations with JSON arguments. The registry
//! knows nothing about the agent runtime; the agent and the direct tool
//! endpoints both consume it through [`ToolRegistry::definitions`] and
//! [`ToolRegistry::invoke`].

use super::toolkit::FitnessToolkit;
use crate::repositories::StoreError;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

// ============================================================================
// Definitions
// ============================================================================

/// Function tool advertised to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object
    pub parameters: Value,
}

impl ToolDefinition {
    fn function(name: &str, description: &str, parameters: Value) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionDefinition {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}

fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn builtin_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::function(
            "calculate_tdee_and_macros",
            "Calculates daily energy expenditure and a calorie and macronutrient target from a user's profile.",
            object_schema(
                json!({
                    "weight_kg": { "type": "number", "description": "Body weight in kilograms" },
                    "height_cm": { "type": "number", "description": "Height in centimeters" },
                    "age": { "type": "integer", "description": "Age in years" },
                    "gender": { "type": "string", "description": "'male' selects the male formula" },
                    "activity_level": {
                        "type": "string",
                        "description": "One of sedentary, lightly_active, moderately_active, very_active"
                    },
                    "goal": { "type": "string", "description": "One of lose_fat, build_muscle, maintain" }
                }),
                &["weight_kg", "height_cm", "age", "gender", "activity_level", "goal"],
            ),
        ),
        ToolDefinition::function(
            "calculate_bmi",
            "Calculates Body Mass Index (BMI) and provides a general category.",
            object_schema(
                json!({
                    "weight_kg": { "type": "number" },
                    "height_cm": { "type": "number" }
                }),
                &["weight_kg", "height_cm"],
            ),
        ),
        ToolDefinition::function(
            "estimate_one_rep_max",
            "Estimates the one-rep max (1RM) from a given weight and rep count using the Brzycki formula.",
            object_schema(
                json!({
                    "weight_kg": { "type": "number" },
                    "reps": { "type": "integer" }
                }),
                &["weight_kg", "reps"],
            ),
        ),
        ToolDefinition::function(
            "find_exercises_by_muscle",
            "Finds and lists exercises for a specific muscle group using available equipment.",
            object_schema(
                json!({
                    "target_muscle": {
                        "type": "string",
                        "description": "Chest, Back, Legs, Shoulders, Biceps, Triceps, Core or Cardio"
                    },
                    "equipment": { "type": "string", "description": "e.g. Barbell, Dumbbells, Bodyweight" }
                }),
                &["target_muscle", "equipment"],
            ),
        ),
        ToolDefinition::function(
            "get_macronutrients_for_food",
            "Calculates the calories and macronutrients for a specific weight of a given food.",
            object_schema(
                json!({
                    "food_name": { "type": "string" },
                    "weight_grams": { "type": "number" }
                }),
                &["food_name", "weight_grams"],
            ),
        ),
        ToolDefinition::function(
            "log_workout",
            "Logs a completed workout for a user in the database.",
            object_schema(
                json!({
                    "user_id": { "type": "integer" },
                    "exercise_name": { "type": "string" },
                    "sets": { "type": "integer" },
                    "reps": { "type": "integer" },
                    "weight_kg": { "type": "number" }
                }),
                &["user_id", "exercise_name", "sets", "reps", "weight_kg"],
            ),
        ),
        ToolDefinition::function(
            "log_daily_weight",
            "Logs the user's body weight for the current day.",
            object_schema(
                json!({
                    "user_id": { "type": "integer" },
                    "weight_kg": { "type": "number" }
                }),
                &["user_id", "weight_kg"],
            ),
        ),
        ToolDefinition::function(
            "get_strength_progress",
            "Retrieves and summarizes a user's strength progress for a specific exercise over time.",
            object_schema(
                json!({
                    "user_id": { "type": "integer" },
                    "exercise_name": { "type": "string" }
                }),
                &["user_id", "exercise_name"],
            ),
        ),
        ToolDefinition::function(
            "suggest_exercise_substitutions",
            "Suggests alternative exercises for a given exercise, using only available equipment.",
            object_schema(
                json!({
                    "exercise_to_replace": { "type": "string" },
                    "available_equipment": { "type": "array", "items": { "type": "string" } }
                }),
                &["exercise_to_replace", "available_equipment"],
            ),
        ),
    ]
}

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, Deserialize)]
struct TdeeArgs {
    weight_kg: f64,
    height_cm: f64,
    #[serde(deserialize_with = "whole_number")]
    age: i32,
    gender: String,
    activity_level: String,
    goal: String,
}

#[derive(Debug, Deserialize)]
struct BmiArgs {
    weight_kg: f64,
    height_cm: f64,
}

#[derive(Debug, Deserialize)]
struct OneRepMaxArgs {
    weight_kg: f64,
    #[serde(deserialize_with = "whole_number")]
    reps: i32,
}

#[derive(Debug, Deserialize)]
struct ExerciseLookupArgs {
    target_muscle: String,
    equipment: String,
}

#[derive(Debug, Deserialize)]
struct FoodArgs {
    food_name: String,
    weight_grams: f64,
}

#[derive(Debug, Deserialize)]
struct LogWorkoutArgs {
    #[serde(deserialize_with = "whole_number")]
    user_id: i64,
    exercise_name: String,
    #[serde(deserialize_with = "whole_number")]
    sets: i32,
    #[serde(deserialize_with = "whole_number")]
    reps: i32,
    weight_kg: f64,
}

#[derive(Debug, Deserialize)]
struct LogWeightArgs {
    #[serde(deserialize_with = "whole_number")]
    user_id: i64,
    weight_kg: f64,
}

#[derive(Debug, Deserialize)]
struct ProgressArgs {
    #[serde(deserialize_with = "whole_number")]
    user_id: i64,
    exercise_name: String,
}

#[derive(Debug, Deserialize)]
struct SubstitutionArgs {
    exercise_to_replace: String,
    available_equipment: Vec<String>,
}

/// Integer argument that models may send as `5`, `5.0` or `"5"`. Fractions
/// and values outside the target type are rejected, never rounded or clamped.
fn whole_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT_INT)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| D::Error::custom(format!("expected a whole number, got {}", value)))?;

    T::try_from(number).map_err(|_| D::Error::custom(format!("{} is out of range", number)))
}

/// Largest float magnitude below which every integer is exact
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

// ============================================================================
// Invocation
// ============================================================================

/// Result of a tool call
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    Json(Value),
}

impl ToolOutput {
    pub fn into_value(self) -> Value {
        match self {
            ToolOutput::Text(text) => Value::String(text),
            ToolOutput::Json(value) => value,
        }
    }

    /// Content of the tool message returned to the model
    pub fn to_model_content(&self) -> String {
        match self {
            ToolOutput::Text(text) => text.clone(),
            ToolOutput::Json(value) => value.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Invalid arguments for '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ToolError {
    fn outcome(&self) -> &'static str {
        match self {
            ToolError::UnknownTool(_) => "unknown_tool",
            ToolError::InvalidArguments { .. } => "invalid_arguments",
            ToolError::Store(_) => "store_error",
        }
    }
}

/// The nine coaching tools, keyed by name
#[derive(Clone)]
pub struct ToolRegistry {
    toolkit: FitnessToolkit,
    definitions: Vec<ToolDefinition>,
}

impl ToolRegistry {
    pub fn new(toolkit: FitnessToolkit) -> Self {
        Self {
            toolkit,
            definitions: builtin_definitions(),
        }
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.iter().any(|d| d.name() == name)
    }

    /// Invoke a tool by name, recording a call counter and duration
    pub async fn invoke(&self, name: &str, arguments: Value) -> Result<ToolOutput, ToolError> {
        let started = Instant::now();
        let result = self.dispatch(name, arguments).await;
        let elapsed = started.elapsed();

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.outcome(),
        };
        let tool_label = if self.contains(name) { name.to_string() } else { "unknown".to_string() };

        metrics::counter!(
            "fitforge_tool_calls_total",
            "tool" => tool_label.clone(),
            "outcome" => outcome
        )
        .increment(1);
        metrics::histogram!("fitforge_tool_call_duration_seconds", "tool" => tool_label)
            .record(elapsed.as_secs_f64());

        match &result {
            Err(ToolError::Store(e)) => {
                warn!(tool = name, outcome, elapsed_ms = elapsed.as_millis() as u64, error = %e, "Tool failed")
            }
            _ => info!(tool = name, outcome, elapsed_ms = elapsed.as_millis() as u64, "Tool invoked"),
        }

        result
    }

    async fn dispatch(&self, name: &str, arguments: Value) -> Result<ToolOutput, ToolError> {
        let toolkit = &self.toolkit;

        let output = match name {
            "calculate_tdee_and_macros" => {
                let a: TdeeArgs = parse_args(name, arguments)?;
                let targets = toolkit.calculate_tdee_and_macros(
                    a.weight_kg,
                    a.height_cm,
                    a.age,
                    &a.gender,
                    &a.activity_level,
                    &a.goal,
                );
                ToolOutput::Json(json!(targets))
            }
            "calculate_bmi" => {
                let a: BmiArgs = parse_args(name, arguments)?;
                ToolOutput::Text(toolkit.calculate_bmi(a.weight_kg, a.height_cm))
            }
            "estimate_one_rep_max" => {
                let a: OneRepMaxArgs = parse_args(name, arguments)?;
                ToolOutput::Text(toolkit.estimate_one_rep_max(a.weight_kg, a.reps))
            }
            "find_exercises_by_muscle" => {
                let a: ExerciseLookupArgs = parse_args(name, arguments)?;
                ToolOutput::Text(toolkit.find_exercises_by_muscle(&a.target_muscle, &a.equipment).await?)
            }
            "get_macronutrients_for_food" => {
                let a: FoodArgs = parse_args(name, arguments)?;
                ToolOutput::Text(toolkit.get_macronutrients_for_food(&a.food_name, a.weight_grams).await?)
            }
            "log_workout" => {
                let a: LogWorkoutArgs = parse_args(name, arguments)?;
                ToolOutput::Text(
                    toolkit
                        .log_workout(a.user_id, &a.exercise_name, a.sets, a.reps, a.weight_kg)
                        .await?,
                )
            }
            "log_daily_weight" => {
                let a: LogWeightArgs = parse_args(name, arguments)?;
                ToolOutput::Text(toolkit.log_daily_weight(a.user_id, a.weight_kg).await?)
            }
            "get_strength_progress" => {
                let a: ProgressArgs = parse_args(name, arguments)?;
                ToolOutput::Text(toolkit.get_strength_progress(a.user_id, &a.exercise_name).await?)
            }
            "suggest_exercise_substitutions" => {
                let a: SubstitutionArgs = parse_args(name, arguments)?;
                ToolOutput::Text(
                    toolkit
                        .suggest_exercise_substitutions(&a.exercise_to_replace, &a.available_equipment)
                        .await?,
                )
            }
            other => return Err(ToolError::UnknownTool(other.to_string())),
        };

        Ok(output)
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolError> {
    // Some models send the arguments object JSON-encoded as a string
    let arguments = match arguments {
        Value::String(raw) => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
        Value::Null => json!({}),
        other => other,
    };

    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}
