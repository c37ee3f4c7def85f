//! Core traits for sous abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// RECIPE REPOSITORY
// =============================================================================

/// Request for creating a new recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<IngredientLine>,
    pub steps: Vec<RecipeStep>,
    #[serde(default)]
    pub nutritional_info: Option<NutritionalInfo>,
    #[serde(default)]
    pub allergy_disclaimer: Option<String>,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub diets: Vec<String>,
    #[serde(default)]
    pub appliances: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub prep_time_minutes: i32,
    pub cook_time_minutes: i32,
    pub servings: i32,
    /// Generated candidates start unapproved; user submissions may be
    /// approved directly by an admin flow.
    #[serde(default)]
    pub approved: bool,
}

/// Partial update for an existing recipe. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<IngredientLine>>,
    pub steps: Option<Vec<RecipeStep>>,
    pub nutritional_info: Option<NutritionalInfo>,
    pub allergy_disclaimer: Option<String>,
    pub cuisines: Option<Vec<String>>,
    pub diets: Option<Vec<String>>,
    pub appliances: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub difficulty: Option<Difficulty>,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub approved: Option<bool>,
}

/// Request for listing recipes.
#[derive(Debug, Clone, Default)]
pub struct ListRecipesRequest {
    /// Only approved recipes when true.
    pub approved_only: bool,
    /// Maximum results.
    pub limit: Option<i64>,
    /// Pagination offset.
    pub offset: Option<i64>,
}

/// Response for listing recipes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub total: i64,
}

/// A recipe hit from vector similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarRecipe {
    pub recipe_id: Uuid,
    pub title: String,
    pub score: f32,
}

/// Repository for recipe storage and retrieval.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a new recipe, returning its generated id.
    async fn insert(&self, req: CreateRecipeRequest) -> Result<Uuid>;

    /// Fetch a full recipe by id.
    async fn fetch(&self, id: Uuid) -> Result<Recipe>;

    /// List recipes with pagination.
    async fn list(&self, req: ListRecipesRequest) -> Result<ListRecipesResponse>;

    /// Apply a partial update.
    async fn update(&self, id: Uuid, req: UpdateRecipeRequest) -> Result<()>;

    /// Soft-delete a recipe.
    async fn soft_delete(&self, id: Uuid) -> Result<()>;

    /// Check if a recipe exists (and is not deleted).
    async fn exists(&self, id: Uuid) -> Result<bool>;

    /// Fetch match candidates for a parsed query.
    ///
    /// Returns approved, non-deleted recipes containing none of the
    /// query's exclusion ingredients. Ranking happens in the caller.
    async fn fetch_candidates(&self, query: &ParsedQuery, limit: i64) -> Result<Vec<Recipe>>;

    /// Store the embedding vector for a recipe.
    ///
    /// Rejects vectors whose dimension does not match the configured
    /// vector column dimension.
    async fn store_embedding(&self, id: Uuid, vector: &Vector, model: &str) -> Result<()>;

    /// Find recipes similar to the given vector.
    async fn find_similar(&self, query_vec: &Vector, limit: i64) -> Result<Vec<SimilarRecipe>>;
}

// =============================================================================
// USER REPOSITORY
// =============================================================================

/// Request for creating a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub dietary_restriction: Option<String>,
}

/// Profile update for an existing user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub allergies: Option<Vec<String>>,
    pub dietary_restriction: Option<String>,
}

/// Repository for user storage and retrieval.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, returning its generated id.
    async fn insert(&self, req: CreateUserRequest) -> Result<Uuid>;

    /// Fetch a user by id. Soft-deleted users are not returned.
    async fn fetch(&self, id: Uuid) -> Result<User>;

    /// Fetch a user by email. Soft-deleted users are not returned.
    async fn fetch_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Update profile fields.
    async fn update_profile(&self, id: Uuid, req: UpdateProfileRequest) -> Result<()>;

    /// Record a successful login (last_login_at, last_active_at).
    async fn touch_login(&self, id: Uuid) -> Result<()>;

    /// Soft-delete a user (sets deleted_at).
    async fn soft_delete(&self, id: Uuid) -> Result<()>;

    /// Restore a soft-deleted user.
    async fn restore(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// INFERENCE BACKENDS
// =============================================================================

/// Backend capable of text generation from a composite prompt.
///
/// The response is treated as an opaque string by this trait; callers
/// decide whether and how to parse it.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text from a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifier used for generation.
    fn model_name(&self) -> &str;
}

/// Backend capable of producing embedding vectors for text.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Embed a single text into a fixed-length vector.
    async fn embed(&self, text: &str) -> Result<Vector>;

    /// Vector dimension this backend produces.
    fn dimension(&self) -> usize;

    /// Model identifier used for embedding.
    fn model_name(&self) -> &str;
}
