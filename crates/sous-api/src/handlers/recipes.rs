//! Recipe CRUD endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use sous_core::defaults::LIST_LIMIT;
use sous_core::{CreateRecipeRequest, ListRecipesRequest, UpdateRecipeRequest};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    #[serde(default)]
    pub approved_only: bool,
}

/// GET /v1/recipes
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .recipes
        .list(ListRecipesRequest {
            approved_only: query.approved_only,
            limit: Some(query.limit.unwrap_or(LIST_LIMIT)),
            offset: query.offset,
        })
        .await?;
    Ok(Json(response))
}

/// POST /v1/recipes
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(req): Json<CreateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title must not be empty".to_string()));
    }
    let id = state.recipes.insert(req).await?;
    let recipe = state.recipes.fetch(id).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// GET /v1/recipes/:id
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let recipe = state.recipes.fetch(id).await?;
    Ok(Json(recipe))
}

/// PUT /v1/recipes/:id
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.recipes.update(id, req).await?;
    let recipe = state.recipes.fetch(id).await?;
    Ok(Json(recipe))
}

/// DELETE /v1/recipes/:id
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.recipes.exists(id).await? {
        return Err(ApiError::NotFound(format!("Recipe {id} not found")));
    }
    state.recipes.soft_delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Recipe deleted",
    })))
}
