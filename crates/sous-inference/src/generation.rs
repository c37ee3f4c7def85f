//! HTTP generation client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use sous_core::{Error, GenerationBackend, Result};

use crate::retry::{retry, RetryPolicy};

/// Default generation endpoint.
pub const DEFAULT_GENERATION_URL: &str = "https://api.openai.com/v1";

/// Configuration for the generation client.
///
/// Endpoints and secrets are supplied externally; nothing is compiled in.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Base URL for the generation API.
    pub base_url: String,
    /// Bearer token for authentication.
    pub api_key: String,
    /// Model to use for generation.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry policy for failed calls.
    pub retry: RetryPolicy,
}

impl GenerationConfig {
    /// Build configuration from environment variables.
    ///
    /// `SOUS_GENERATION_API_KEY` is required; `SOUS_GENERATION_URL` and
    /// `SOUS_GENERATION_MODEL` fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("SOUS_GENERATION_API_KEY")
            .map_err(|_| Error::Config("SOUS_GENERATION_API_KEY is not set".to_string()))?;
        Ok(Self {
            base_url: std::env::var("SOUS_GENERATION_URL")
                .unwrap_or_else(|_| DEFAULT_GENERATION_URL.to_string()),
            api_key,
            model: std::env::var("SOUS_GENERATION_MODEL")
                .unwrap_or_else(|_| sous_core::defaults::GENERATION_MODEL.to_string()),
            timeout_secs: sous_core::defaults::GENERATION_TIMEOUT_SECS,
            retry: RetryPolicy::default(),
        })
    }
}

/// HTTP client for an OpenAI-compatible chat completion endpoint.
pub struct HttpGenerationClient {
    client: Client,
    config: GenerationConfig,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl HttpGenerationClient {
    /// Create a new generation client from configuration.
    pub fn new(config: GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Generation(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "generation",
            model = %config.model,
            base_url = %config.base_url,
            "Initializing generation client"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(GenerationConfig::from_env()?)
    }

    /// One generation attempt. Transport errors, non-2xx statuses, and
    /// unreadable bodies all count as failures for the retry loop.
    async fn attempt(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "Upstream returned {}: {}",
                status, body
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("Failed to parse response: {}", e)))?;

        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Generation("Upstream returned no choices".to_string()))
    }
}

#[async_trait]
impl GenerationBackend for HttpGenerationClient {
    #[instrument(skip(self, prompt), fields(subsystem = "inference", component = "generation", op = "generate", model = %self.config.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();

        let content = retry(&self.config.retry, "generation", || {
            self.attempt(prompt)
        })
        .await?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            response_len = content.len(),
            duration_ms = elapsed,
            "Generation complete"
        );
        if elapsed > 30_000 {
            warn!(
                duration_ms = elapsed,
                prompt_len = prompt.len(),
                slow = true,
                "Slow generation operation"
            );
        }
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
