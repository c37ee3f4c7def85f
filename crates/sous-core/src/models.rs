//! Data models for the sous recipe service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

// =============================================================================
// EMBEDDING TYPES
// =============================================================================

/// Embedding vector type (re-exported from pgvector).
pub use pgvector::Vector;

// =============================================================================
// RECIPE TYPES
// =============================================================================

/// Recipe difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Parse a difficulty keyword. Unrecognized input returns `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// A single ingredient line within a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// A single preparation step. Steps are ordered by `order`, ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub order: i32,
    pub description: String,
}

/// Per-serving nutritional summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionalInfo {
    pub calories: i32,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
}

/// A stored recipe.
///
/// Created by user submission or by the resolution pipeline. Generated
/// recipes start with `approved: false` until reviewed. Recipes are
/// soft-deleted, never physically removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<IngredientLine>,
    pub steps: Vec<RecipeStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutritional_info: Option<NutritionalInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergy_disclaimer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cuisines: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diets: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub appliances: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    pub difficulty: Difficulty,
    pub prep_time_minutes: i32,
    pub cook_time_minutes: i32,
    pub servings: i32,
    pub approved: bool,
    /// Embedding vector for similarity search. Not exposed over the wire.
    #[serde(skip)]
    pub embedding: Option<Vector>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Total preparation plus cooking time in minutes.
    pub fn total_minutes(&self) -> i32 {
        self.prep_time_minutes + self.cook_time_minutes
    }

    /// True if any ingredient name contains `name` (case-insensitive).
    pub fn contains_ingredient(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        self.ingredients
            .iter()
            .any(|i| i.name.to_lowercase().contains(&needle))
    }

    /// Text used for embedding: title plus description.
    pub fn embedding_text(&self) -> String {
        embedding_text(&self.title, &self.description)
    }
}

/// The text a recipe is embedded from: title and description, one per
/// line. Also used for drafts that are not yet a stored [`Recipe`].
pub fn embedding_text(title: &str, description: &str) -> String {
    format!("{title}\n{description}")
}

/// Compact recipe view for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub difficulty: Difficulty,
    pub prep_time_minutes: i32,
    pub cook_time_minutes: i32,
    pub servings: i32,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// USER TYPES
// =============================================================================

/// A registered user.
///
/// Soft-deleted via `deleted_at`; never physically removed. The profile
/// fields (`allergies`, `dietary_restriction`) feed the prompt builder
/// during recipe generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_admin: bool,
    pub email_verified: bool,
    #[serde(skip_serializing, default)]
    pub verification_token: Option<String>,
    #[serde(skip_serializing, default)]
    pub verification_token_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing, default)]
    pub reset_token: Option<String>,
    #[serde(skip_serializing, default)]
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allergies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_restriction: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub last_active_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Profile entries for the prompt builder, in a fixed, stable order.
    pub fn profile_entries(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        if !self.allergies.is_empty() {
            entries.push(("allergies".to_string(), self.allergies.join(", ")));
        }
        if let Some(diet) = &self.dietary_restriction {
            entries.push(("dietary restriction".to_string(), diet.clone()));
        }
        entries
    }
}

// =============================================================================
// PARSED QUERY
// =============================================================================

/// Structured representation of a freeform recipe request.
///
/// Produced by the query parser; immutable once built. Absent cuisine
/// serializes as `"unknown"` and absent dietary restriction as `"none"`
/// to match the inherited wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ParsedQuery {
    #[serde(
        serialize_with = "ser_unknown",
        deserialize_with = "de_unknown",
        default
    )]
    pub cuisine: Option<String>,
    #[serde(serialize_with = "ser_none", deserialize_with = "de_none", default)]
    pub dietary_restriction: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_total_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub servings: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_calories: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub difficulty: Option<Difficulty>,
}

impl ParsedQuery {
    /// True when no attribute beyond the raw text was recognized.
    pub fn is_unconstrained(&self) -> bool {
        self.cuisine.is_none()
            && self.dietary_restriction.is_none()
            && self.ingredients.is_empty()
            && self.exclusions.is_empty()
            && self.max_total_minutes.is_none()
            && self.servings.is_none()
            && self.max_calories.is_none()
            && self.difficulty.is_none()
    }
}

fn ser_unknown<S: Serializer>(v: &Option<String>, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(v.as_deref().unwrap_or("unknown"))
}

fn de_unknown<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    let v = String::deserialize(d)?;
    Ok(if v == "unknown" { None } else { Some(v) })
}

fn ser_none<S: Serializer>(v: &Option<String>, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(v.as_deref().unwrap_or("none"))
}

fn de_none<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    let v = String::deserialize(d)?;
    Ok(if v == "none" { None } else { Some(v) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_recipe() -> Recipe {
        Recipe {
            id: Uuid::now_v7(),
            title: "Tomato Tacos".to_string(),
            description: "Simple tacos with fresh tomatoes.".to_string(),
            ingredients: vec![
                IngredientLine {
                    name: "Tomatoes".to_string(),
                    amount: 3.0,
                    unit: "whole".to_string(),
                },
                IngredientLine {
                    name: "corn tortillas".to_string(),
                    amount: 6.0,
                    unit: "pieces".to_string(),
                },
            ],
            steps: vec![RecipeStep {
                order: 1,
                description: "Dice the tomatoes.".to_string(),
            }],
            nutritional_info: None,
            allergy_disclaimer: None,
            cuisines: vec!["mexican".to_string()],
            diets: vec!["vegan".to_string()],
            appliances: vec![],
            tags: vec![],
            images: vec![],
            difficulty: Difficulty::Easy,
            prep_time_minutes: 10,
            cook_time_minutes: 5,
            servings: 2,
            approved: true,
            embedding: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("impossible"), None);
    }

    #[test]
    fn test_difficulty_serde_lowercase() {
        let json = serde_json::to_string(&Difficulty::Easy).unwrap();
        assert_eq!(json, "\"easy\"");
    }

    #[test]
    fn test_total_minutes() {
        let recipe = sample_recipe();
        assert_eq!(recipe.total_minutes(), 15);
    }

    #[test]
    fn test_embedding_text_rule_is_shared() {
        let recipe = sample_recipe();
        assert_eq!(
            recipe.embedding_text(),
            embedding_text(&recipe.title, &recipe.description)
        );
        assert_eq!(
            recipe.embedding_text(),
            "Tomato Tacos\nSimple tacos with fresh tomatoes."
        );
    }

    #[test]
    fn test_contains_ingredient_case_insensitive() {
        let recipe = sample_recipe();
        assert!(recipe.contains_ingredient("tomatoes"));
        assert!(recipe.contains_ingredient("Tortillas"));
        assert!(!recipe.contains_ingredient("onions"));
    }

    #[test]
    fn test_recipe_serialization_skips_embedding() {
        let mut recipe = sample_recipe();
        recipe.embedding = Some(Vector::from(vec![0.1, 0.2]));
        let json = serde_json::to_string(&recipe).unwrap();
        assert!(!json.contains("embedding"));
    }

    #[test]
    fn test_parsed_query_sentinel_serialization() {
        let parsed = ParsedQuery::default();
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["cuisine"], "unknown");
        assert_eq!(json["dietary_restriction"], "none");
    }

    #[test]
    fn test_parsed_query_sentinel_roundtrip() {
        let parsed = ParsedQuery {
            cuisine: Some("mexican".to_string()),
            dietary_restriction: None,
            ingredients: vec!["tomatoes".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_string(&parsed).unwrap();
        let back: ParsedQuery = serde_json::from_str(&json).unwrap();
        assert_eq!(back, parsed);
    }

    #[test]
    fn test_parsed_query_is_unconstrained() {
        assert!(ParsedQuery::default().is_unconstrained());
        let parsed = ParsedQuery {
            cuisine: Some("thai".to_string()),
            ..Default::default()
        };
        assert!(!parsed.is_unconstrained());
    }

    #[test]
    fn test_user_profile_entries_order() {
        let user = User {
            id: Uuid::now_v7(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "x".to_string(),
            is_admin: false,
            email_verified: true,
            verification_token: None,
            verification_token_expires_at: None,
            reset_token: None,
            reset_token_expires_at: None,
            allergies: vec!["peanuts".to_string(), "shellfish".to_string()],
            dietary_restriction: Some("vegan".to_string()),
            last_login_at: None,
            last_active_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        let entries = user.profile_entries();
        assert_eq!(entries[0].0, "allergies");
        assert_eq!(entries[0].1, "peanuts, shellfish");
        assert_eq!(entries[1], ("dietary restriction".to_string(), "vegan".to_string()));
    }

    #[test]
    fn test_user_serialization_hides_secrets() {
        let user = User {
            id: Uuid::now_v7(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            is_admin: false,
            email_verified: false,
            verification_token: Some("tok".to_string()),
            verification_token_expires_at: None,
            reset_token: None,
            reset_token_expires_at: None,
            allergies: vec![],
            dietary_restriction: None,
            last_login_at: None,
            last_active_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("\"tok\""));
    }
}
