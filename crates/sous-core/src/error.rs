//! Error types for the sous recipe service.

use thiserror::Error;

/// Result type alias using sous's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sous operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Resolution query was empty after trimming
    #[error("Query must not be empty")]
    EmptyQuery,

    /// Text generation failed after exhausting retries
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Embedding generation failed after exhausting retries
    #[error("Embedding failed: {0}")]
    Embedding(String),

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Recipe not found
    #[error("Recipe not found: {0}")]
    RecipeNotFound(uuid::Uuid),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(uuid::Uuid),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_empty_query_display() {
        let err = Error::EmptyQuery;
        assert_eq!(err.to_string(), "Query must not be empty");
    }

    #[test]
    fn test_generation_display() {
        let err = Error::Generation("upstream returned 503".to_string());
        assert_eq!(err.to_string(), "Generation failed: upstream returned 503");
    }

    #[test]
    fn test_embedding_display() {
        let err = Error::Embedding("empty data array".to_string());
        assert_eq!(err.to_string(), "Embedding failed: empty data array");
    }

    #[test]
    fn test_config_display() {
        let err = Error::Config("missing API key".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing API key");
    }

    #[test]
    fn test_recipe_not_found_display() {
        let id = Uuid::new_v4();
        let err = Error::RecipeNotFound(id);
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_user_not_found_display() {
        let id = Uuid::nil();
        let err = Error::UserNotFound(id);
        assert_eq!(err.to_string(), format!("User not found: {}", id));
    }

    #[test]
    fn test_invalid_input_display() {
        let err = Error::InvalidInput("embedding dimension mismatch".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid input: embedding dimension mismatch"
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_result_type_ok() {
        fn get_result() -> Result<i32> {
            Ok(7)
        }
        assert_eq!(get_result().unwrap(), 7);
    }
}
