//! Direct tool access
//!
//! Lists the coaching tools and invokes them without a model in the loop.

use crate::error::ApiError;
use crate::services::ToolDefinition;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use fitforge_shared::types::ToolInvocationResponse;
use serde_json::Value;

/// Create tool routes
pub fn tool_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tools))
        .route("/:name", post(invoke_tool))
}

/// GET /api/v1/tools - Tool definitions in function-calling format
async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolDefinition>> {
    Json(state.tools().definitions().to_vec())
}

/// POST /api/v1/tools/:name - Invoke a tool with JSON arguments
async fn invoke_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(arguments): Json<Value>,
) -> Result<Json<ToolInvocationResponse>, ApiError> {
    let output = state.tools().invoke(&name, arguments).await?;

    Ok(Json(ToolInvocationResponse {
        tool: name,
        result: output.into_value(),
    }))
}
