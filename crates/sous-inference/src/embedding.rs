//! HTTP embedding client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use sous_core::{Error, EmbeddingBackend, Result, Vector};

use crate::retry::{retry, RetryPolicy};

/// Default embedding endpoint.
pub const DEFAULT_EMBEDDING_URL: &str = "https://api.openai.com/v1";

/// Dimension of the constant vector returned in bypass mode.
pub const BYPASS_DIMENSION: usize = sous_core::defaults::BYPASS_EMBEDDING.len();

/// Operating mode for the embedding client.
///
/// `Bypass` is an explicit test configuration: it skips the network
/// entirely and returns a constant placeholder vector. It is never
/// selected implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingMode {
    #[default]
    Live,
    Bypass,
}

/// Configuration for the embedding client.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Base URL for the embedding API.
    pub base_url: String,
    /// Bearer token for authentication.
    pub api_key: String,
    /// Model to use for embeddings.
    pub model: String,
    /// Expected vector dimension in live mode.
    pub dimension: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry policy for failed calls.
    pub retry: RetryPolicy,
    /// Live network calls or constant-vector bypass.
    pub mode: EmbeddingMode,
}

impl EmbeddingConfig {
    /// Build configuration from environment variables.
    ///
    /// `SOUS_EMBEDDING_API_KEY` is required in live mode. Setting
    /// `SOUS_EMBEDDING_BYPASS=true` selects bypass mode, which needs no
    /// credentials.
    pub fn from_env() -> Result<Self> {
        let bypass = std::env::var("SOUS_EMBEDDING_BYPASS")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);
        let mode = if bypass {
            EmbeddingMode::Bypass
        } else {
            EmbeddingMode::Live
        };

        let api_key = match mode {
            EmbeddingMode::Bypass => String::new(),
            EmbeddingMode::Live => std::env::var("SOUS_EMBEDDING_API_KEY")
                .map_err(|_| Error::Config("SOUS_EMBEDDING_API_KEY is not set".to_string()))?,
        };

        Ok(Self {
            base_url: std::env::var("SOUS_EMBEDDING_URL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_URL.to_string()),
            api_key,
            model: std::env::var("SOUS_EMBEDDING_MODEL")
                .unwrap_or_else(|_| sous_core::defaults::EMBEDDING_MODEL.to_string()),
            dimension: std::env::var("SOUS_EMBEDDING_DIM")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(sous_core::defaults::EMBEDDING_DIMENSION),
            timeout_secs: sous_core::defaults::EMBEDDING_TIMEOUT_SECS,
            retry: RetryPolicy::default(),
            mode,
        })
    }
}

/// HTTP client for an OpenAI-compatible embedding endpoint.
pub struct HttpEmbeddingClient {
    client: Client,
    config: EmbeddingConfig,
}

#[derive(Serialize)]
struct EmbeddingRequest {
    model: String,
    input: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

impl HttpEmbeddingClient {
    /// Create a new embedding client from configuration.
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Embedding(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "embedding",
            model = %config.model,
            base_url = %config.base_url,
            bypass = config.mode == EmbeddingMode::Bypass,
            "Initializing embedding client"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(EmbeddingConfig::from_env()?)
    }

    /// One embedding attempt against the live endpoint.
    async fn attempt(&self, text: &str) -> Result<Vector> {
        let request = EmbeddingRequest {
            model: self.config.model.clone(),
            input: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!(
                "Upstream returned {}: {}",
                status, body
            )));
        }

        let result: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("Failed to parse response: {}", e)))?;

        let first = result
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("Upstream returned zero embeddings".to_string()))?;

        Ok(Vector::from(first.embedding))
    }
}

#[async_trait]
impl EmbeddingBackend for HttpEmbeddingClient {
    #[instrument(skip(self, text), fields(subsystem = "inference", component = "embedding", op = "embed", model = %self.config.model, input_len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vector> {
        if self.config.mode == EmbeddingMode::Bypass {
            debug!("Bypass mode: returning constant placeholder vector");
            return Ok(Vector::from(sous_core::defaults::BYPASS_EMBEDDING.to_vec()));
        }

        let start = Instant::now();

        let vector = retry(&self.config.retry, "embedding", || self.attempt(text)).await?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            dimension = vector.as_slice().len(),
            duration_ms = elapsed,
            "Embedding complete"
        );
        if elapsed > 5_000 {
            warn!(
                duration_ms = elapsed,
                input_len = text.len(),
                slow = true,
                "Slow embedding operation"
            );
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        match self.config.mode {
            EmbeddingMode::Bypass => BYPASS_DIMENSION,
            EmbeddingMode::Live => self.config.dimension,
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bypass_config() -> EmbeddingConfig {
        EmbeddingConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: String::new(),
            model: "test-embed".to_string(),
            dimension: 1536,
            timeout_secs: 5,
            retry: RetryPolicy::immediate(1),
            mode: EmbeddingMode::Bypass,
        }
    }

    #[tokio::test]
    async fn test_bypass_mode_returns_constant_vector() {
        let client = HttpEmbeddingClient::new(bypass_config()).unwrap();

        let vector = client.embed("any text at all").await.unwrap();
        assert_eq!(vector.as_slice(), &[0.1, 0.2, 0.3, 0.4, 0.5]);

        let other = client.embed("completely different text").await.unwrap();
        assert_eq!(other.as_slice(), vector.as_slice());
    }

    #[tokio::test]
    async fn test_bypass_mode_reports_dimension_five() {
        let client = HttpEmbeddingClient::new(bypass_config()).unwrap();
        assert_eq!(client.dimension(), 5);
    }

    #[test]
    fn test_live_mode_reports_configured_dimension() {
        let config = EmbeddingConfig {
            mode: EmbeddingMode::Live,
            ..bypass_config()
        };
        let client = HttpEmbeddingClient::new(config).unwrap();
        assert_eq!(client.dimension(), 1536);
    }

    #[test]
    fn test_embedding_response_deserialization() {
        let json = r#"{"data": [{"embedding": [0.25, -0.5, 1.0]}]}"#;
        let response: EmbeddingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data[0].embedding, vec![0.25, -0.5, 1.0]);
    }

    #[test]
    fn test_default_timeout_is_thirty_seconds() {
        assert_eq!(sous_core::defaults::EMBEDDING_TIMEOUT_SECS, 30);
    }
}
