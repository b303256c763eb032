//! User and profile API routes

use crate::error::ApiError;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use fitforge_shared::types::{CreateUserRequest, ProfileResponse, UpdateProfileRequest, UserResponse};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/:id/profile", get(get_profile).put(update_profile))
}

/// POST /api/v1/users - Register a user
async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = ProfileService::create_user(state.store(), req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/:id/profile - Profile with BMI and daily targets
async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = ProfileService::get_profile(state.store(), user_id).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/users/:id/profile - Create or replace the profile
async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = ProfileService::update_profile(state.store(), user_id, req).await?;
    Ok(Json(profile))
}
