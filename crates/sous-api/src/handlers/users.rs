//! User endpoints.
//!
//! Authentication flows are out of scope; callers supply a precomputed
//! password hash and the profile fields that feed recipe generation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use sous_core::{CreateUserRequest, UpdateProfileRequest};

use crate::error::ApiError;
use crate::AppState;

/// POST /v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }
    let id = state.users.insert(req).await?;
    let user = state.users.fetch(id).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.fetch(id).await?;
    Ok(Json(user))
}

/// PUT /v1/users/:id/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.users.update_profile(id, req).await?;
    let user = state.users.fetch(id).await?;
    Ok(Json(user))
}

/// DELETE /v1/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.users.soft_delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "User deleted",
    })))
}

/// POST /v1/users/:id/restore
pub async fn restore_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.users.restore(id).await?;
    let user = state.users.fetch(id).await?;
    Ok(Json(user))
}
