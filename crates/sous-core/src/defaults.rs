//! Default configuration values shared across sous crates.
//!
//! Centralizing these keeps the clients, parser, and prompt builder in
//! agreement without compiling endpoints or secrets into any one crate.

// ─── Inference ─────────────────────────────────────────────────────────────

/// Timeout for generation requests (seconds).
pub const GENERATION_TIMEOUT_SECS: u64 = 60;

/// Timeout for embedding requests (seconds).
pub const EMBEDDING_TIMEOUT_SECS: u64 = 30;

/// Default generation model.
pub const GENERATION_MODEL: &str = "gpt-4o-mini";

/// Default embedding model.
pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Expected embedding dimension for the default embedding model.
/// Must match the vector column dimension in the recipe table.
pub const EMBEDDING_DIMENSION: usize = 1536;

/// Number of attempts for outbound inference calls.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Fixed delay between retry attempts (seconds). No jitter, no backoff.
pub const RETRY_DELAY_SECS: u64 = 2;

/// Constant vector returned by the embedding client in bypass mode.
pub const BYPASS_EMBEDDING: [f32; 5] = [0.1, 0.2, 0.3, 0.4, 0.5];

// ─── Prompt builder ────────────────────────────────────────────────────────

/// Header marker opening every composite prompt.
pub const PROMPT_HEADER: &str = "=== Composite Prompt for Recipe Resolution ===";

/// Footer marker closing every composite prompt.
pub const PROMPT_FOOTER: &str = "=== End of Prompt ===";

/// Instructions used when the caller supplies none.
pub const DEFAULT_INSTRUCTIONS: &str = "You are an experienced chef. Create a complete, realistic recipe that satisfies the request. Respect every allergy and dietary restriction listed in the profile. Respond with JSON only.";

/// Expected response schema description used when the caller supplies none.
pub const DEFAULT_RESPONSE_SCHEMA: &str = r#"Respond with a single JSON object: {"title": string, "description": string, "ingredients": [{"name": string, "amount": number, "unit": string}], "steps": [{"order": number, "description": string}], "cuisines": [string], "diets": [string], "difficulty": "easy"|"medium"|"hard", "prep_time_minutes": number, "cook_time_minutes": number, "servings": number, "allergy_disclaimer": string}"#;

// ─── Query parser vocabulary ───────────────────────────────────────────────

/// Recognized cuisine keywords, matched case-insensitively.
pub const CUISINES: &[&str] = &[
    "mexican",
    "italian",
    "french",
    "chinese",
    "japanese",
    "thai",
    "indian",
    "greek",
    "spanish",
    "korean",
    "vietnamese",
    "mediterranean",
    "american",
    "lebanese",
    "moroccan",
];

/// Recognized dietary restriction keywords, matched case-insensitively.
pub const DIETS: &[&str] = &[
    "vegan",
    "vegetarian",
    "pescatarian",
    "keto",
    "paleo",
    "gluten-free",
    "dairy-free",
    "halal",
    "kosher",
];

/// Tokens ignored during ingredient extraction.
pub const STOP_WORDS: &[&str] = &[
    "i", "a", "an", "the", "want", "need", "like", "would", "some", "make", "cook", "dish", "meal",
    "recipe", "food", "with", "and", "or", "for", "of", "to", "in", "that", "is", "me", "please",
    "something", "using", "have",
];

// ─── Matching ──────────────────────────────────────────────────────────────

/// Default number of candidates fetched from the store for ranking.
pub const MATCH_CANDIDATE_LIMIT: i64 = 50;

/// Maximum alternatives returned alongside an exact match.
pub const MAX_ALTERNATIVES: usize = 3;

// ─── Database ──────────────────────────────────────────────────────────────

/// Default maximum number of connections in the pool.
pub const MAX_CONNECTIONS: u32 = 10;

/// Default page size for list endpoints.
pub const LIST_LIMIT: i64 = 50;
