//! Resolution orchestrator.
//!
//! Drives a query through the full pipeline: parse, search, and either
//! return stored matches or generate a new candidate, embed it, and
//! persist it. Progress is an explicit state machine; every transition
//! is logged. A failure at any stage is terminal for the request and
//! leaves no partially persisted candidate behind.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use sous_core::defaults::MATCH_CANDIDATE_LIMIT;
use sous_core::{
    CreateRecipeRequest, Difficulty, EmbeddingBackend, Error, GenerationBackend, IngredientLine,
    NutritionalInfo, Recipe, RecipeRepository, RecipeStep, Result,
};

use crate::matcher::{self, MatchOutcome};
use crate::parser;
use crate::prompt;

/// Pipeline state, logged at every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    ParsingQuery,
    SearchingMatches,
    MatchFound,
    NoMatch,
    BuildingPrompt,
    Generating,
    Embedding,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolutionState::ParsingQuery => "parsing_query",
            ResolutionState::SearchingMatches => "searching_matches",
            ResolutionState::MatchFound => "match_found",
            ResolutionState::NoMatch => "no_match",
            ResolutionState::BuildingPrompt => "building_prompt",
            ResolutionState::Generating => "generating",
            ResolutionState::Embedding => "embedding",
            ResolutionState::Persisting => "persisting",
            ResolutionState::Done => "done",
            ResolutionState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A resolution request: the raw query plus optional prompt overrides
/// and profile entries rendered into the generation prompt.
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    pub query: String,
    pub prompt_instructions: Option<String>,
    pub expected_response_format: Option<String>,
    pub profile: Vec<(String, String)>,
}

impl ResolveRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}

/// Outcome of a resolution, tagged by how the result was obtained.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "match_type", rename_all = "lowercase")]
pub enum Resolution {
    /// A stored recipe satisfied every requested attribute.
    Exact {
        recipe: Recipe,
        alternatives: Vec<Recipe>,
    },
    /// Stored recipes satisfied some attributes, best first.
    Close { recipes: Vec<Recipe> },
    /// No stored match; a new candidate was generated and persisted
    /// unapproved.
    Generated {
        candidate: Recipe,
        alternatives: Vec<Recipe>,
    },
}

/// Shape the generation backend is asked to produce. Lenient on
/// extras and omissions so a mostly-right response still lands.
#[derive(Debug, Deserialize)]
struct GeneratedCandidate {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    ingredients: Vec<IngredientLine>,
    #[serde(default)]
    steps: Vec<RecipeStep>,
    #[serde(default)]
    nutritional_info: Option<NutritionalInfo>,
    #[serde(default)]
    allergy_disclaimer: Option<String>,
    #[serde(default)]
    cuisines: Vec<String>,
    #[serde(default)]
    diets: Vec<String>,
    #[serde(default)]
    difficulty: Difficulty,
    #[serde(default)]
    prep_time_minutes: i32,
    #[serde(default)]
    cook_time_minutes: i32,
    #[serde(default = "default_servings")]
    servings: i32,
}

fn default_servings() -> i32 {
    4
}

impl GeneratedCandidate {
    fn into_create_request(self) -> CreateRecipeRequest {
        CreateRecipeRequest {
            title: self.title,
            description: self.description,
            ingredients: self.ingredients,
            steps: self.steps,
            nutritional_info: self.nutritional_info,
            allergy_disclaimer: self.allergy_disclaimer,
            cuisines: self.cuisines,
            diets: self.diets,
            appliances: vec![],
            tags: vec![],
            images: vec![],
            difficulty: self.difficulty,
            prep_time_minutes: self.prep_time_minutes,
            cook_time_minutes: self.cook_time_minutes,
            servings: self.servings,
            approved: false,
        }
    }
}

/// The resolution pipeline over pluggable storage and inference
/// backends.
#[derive(Clone)]
pub struct Resolver {
    recipes: Arc<dyn RecipeRepository>,
    generation: Arc<dyn GenerationBackend>,
    embedding: Arc<dyn EmbeddingBackend>,
}

impl Resolver {
    pub fn new(
        recipes: Arc<dyn RecipeRepository>,
        generation: Arc<dyn GenerationBackend>,
        embedding: Arc<dyn EmbeddingBackend>,
    ) -> Self {
        Self {
            recipes,
            generation,
            embedding,
        }
    }

    /// Resolve a query end to end.
    #[instrument(
        skip(self, req),
        fields(subsystem = "resolve", component = "orchestrator", op = "resolve", query = %req.query)
    )]
    pub async fn resolve(&self, req: ResolveRequest) -> Result<Resolution> {
        let result = self.run(&req).await;
        match &result {
            Ok(resolution) => {
                let match_type = match resolution {
                    Resolution::Exact { .. } => "exact",
                    Resolution::Close { .. } => "close",
                    Resolution::Generated { .. } => "generated",
                };
                info!(
                    state = %ResolutionState::Done,
                    match_type = match_type,
                    "query resolved"
                );
            }
            Err(e) => {
                error!(
                    state = %ResolutionState::Failed,
                    error = %e,
                    "resolution failed"
                );
            }
        }
        result
    }

    async fn run(&self, req: &ResolveRequest) -> Result<Resolution> {
        self.transition(ResolutionState::ParsingQuery);
        let parsed = parser::parse(&req.query)?;

        self.transition(ResolutionState::SearchingMatches);
        let candidates = self
            .recipes
            .fetch_candidates(&parsed, MATCH_CANDIDATE_LIMIT)
            .await?;
        debug!(result_count = candidates.len(), "fetched match candidates");

        match matcher::find_matches(&parsed, candidates) {
            MatchOutcome::Exact {
                recipe,
                alternatives,
            } => {
                self.transition(ResolutionState::MatchFound);
                Ok(Resolution::Exact {
                    recipe,
                    alternatives,
                })
            }
            MatchOutcome::Close { recipes } => {
                self.transition(ResolutionState::MatchFound);
                Ok(Resolution::Close { recipes })
            }
            MatchOutcome::None => {
                self.transition(ResolutionState::NoMatch);
                self.generate_and_persist(req).await
            }
        }
    }

    async fn generate_and_persist(&self, req: &ResolveRequest) -> Result<Resolution> {
        self.transition(ResolutionState::BuildingPrompt);
        let composite = prompt::build_composite_prompt(
            &req.query,
            req.prompt_instructions.as_deref(),
            req.expected_response_format.as_deref(),
            &req.profile,
        );
        debug!(prompt_len = composite.len(), "built composite prompt");

        self.transition(ResolutionState::Generating);
        let response = self.generation.generate(&composite).await?;
        let candidate = parse_candidate(&response)?;

        self.transition(ResolutionState::Embedding);
        let text = sous_core::embedding_text(&candidate.title, &candidate.description);
        let vector = self.embedding.embed(&text).await?;

        self.transition(ResolutionState::Persisting);
        let id = self.recipes.insert(candidate.into_create_request()).await?;
        if let Err(e) = self
            .recipes
            .store_embedding(id, &vector, self.embedding.model_name())
            .await
        {
            // Retract the draft so a failed request persists nothing.
            if let Err(cleanup) = self.recipes.soft_delete(id).await {
                error!(recipe_id = %id, error = %cleanup, "failed to retract draft recipe");
            }
            return Err(e);
        }

        let persisted = self.recipes.fetch(id).await?;
        Ok(Resolution::Generated {
            candidate: persisted,
            alternatives: vec![],
        })
    }

    fn transition(&self, state: ResolutionState) {
        debug!(state = %state, "state transition");
    }
}

/// Parse the generation response into a candidate. The response may be
/// wrapped in a markdown code fence; anything else malformed is an
/// upstream failure.
fn parse_candidate(response: &str) -> Result<GeneratedCandidate> {
    let json = strip_code_fence(response);
    serde_json::from_str(json)
        .map_err(|e| Error::Generation(format!("Generated recipe is not valid JSON: {e}")))
}

/// Strip a surrounding ```/```json fence if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches(['\r', '\n'])
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(trimmed)
}
