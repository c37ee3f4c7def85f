//! Recipe resolution endpoint.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use sous_resolve::{Resolution, ResolveRequest};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ResolveBody {
    pub query: String,
    /// When present, the user's profile (allergies, dietary restriction)
    /// is rendered into the generation prompt.
    pub user_id: Option<Uuid>,
    /// Accepted as `prompt_instructions` or the inherited wire name
    /// `promptInstructions`.
    #[serde(alias = "promptInstructions")]
    pub prompt_instructions: Option<String>,
    #[serde(alias = "expectedResponseFormat")]
    pub expected_response_format: Option<String>,
}

/// POST /v1/recipes/resolve
///
/// Resolve a freeform query into an exact match, close matches, or a
/// freshly generated candidate. The response is tagged by `match_type`.
#[instrument(skip(state, body), fields(subsystem = "api", component = "resolve", op = "resolve_recipe"))]
pub async fn resolve_recipe(
    State(state): State<AppState>,
    Json(body): Json<ResolveBody>,
) -> Result<Json<Resolution>, ApiError> {
    let profile = match body.user_id {
        Some(user_id) => state.users.fetch(user_id).await?.profile_entries(),
        None => Vec::new(),
    };

    let req = ResolveRequest {
        query: body.query,
        prompt_instructions: body.prompt_instructions,
        expected_response_format: body.expected_response_format,
        profile,
    };

    let resolution = state.resolver.resolve(req).await?;
    Ok(Json(resolution))
}
