//! Coaching endpoints: one-shot plans and conversational chat

use crate::error::ApiError;
use crate::services::prompts;
use crate::state::AppState;
use axum::{extract::State, Json};
use fitforge_shared::types::{ChatMode, ChatRequest, ChatResponse, PlanRequest, PlanResponse};
use tracing::info;
use validator::Validate;

/// POST /generate-plan - Combined workout and meal plan for a profile
pub async fn generate_plan(
    State(state): State<AppState>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, ApiError> {
    req.validate()?;

    // One-shot: the response carries no session id, so nothing is stored
    let run = state.agent.run(Vec::new(), &prompts::plan_prompt(&req)).await?;

    info!(
        iterations = run.iterations,
        tool_calls = run.tool_calls.len(),
        "Plan generated"
    );

    Ok(Json(PlanResponse { plan: run.content }))
}

/// POST /chat - Continue (or start) a conversation
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    req.validate()?;

    let mode = ChatMode::from_request(req.mode.as_deref());
    let session = state.sessions.resume_or_create(req.session_id.as_deref()).await;
    let prompt = prompts::chat_prompt(mode, req.user_id, &req.message);

    let run = state.agent.run(session.history, &prompt).await?;

    info!(
        session_id = %session.id,
        mode = ?mode,
        iterations = run.iterations,
        tool_calls = run.tool_calls.len(),
        "Chat turn completed"
    );
    state.sessions.save(session.id, run.history).await;

    Ok(Json(ChatResponse {
        response: run.content,
        session_id: session.id.to_string(),
    }))
}
