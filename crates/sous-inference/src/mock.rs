//! Mock backends for deterministic testing.
//!
//! These implement the core backend traits with scripted behavior and a
//! call log, so orchestrator tests can assert on exactly what was sent
//! upstream without any network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use sous_core::{Error, EmbeddingBackend, GenerationBackend, Result, Vector};

/// Mock generation backend with a fixed response and optional scripted
/// failures for the first N calls.
#[derive(Clone)]
pub struct MockGenerationBackend {
    response: Arc<Mutex<String>>,
    scripted_errors: Arc<Mutex<VecDeque<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockGenerationBackend {
    /// Create a mock that always returns `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Arc::new(Mutex::new(response.into())),
            scripted_errors: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue an error to be returned before any successful response.
    pub fn push_error(&self, message: impl Into<String>) {
        self.scripted_errors
            .lock()
            .unwrap()
            .push_back(message.into());
    }

    /// All prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of generate calls received.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(message) = self.scripted_errors.lock().unwrap().pop_front() {
            return Err(Error::Generation(message));
        }
        Ok(self.response.lock().unwrap().clone())
    }

    fn model_name(&self) -> &str {
        "mock-generation"
    }
}

/// Mock embedding backend returning a deterministic vector derived from
/// the input text length, or scripted failures.
#[derive(Clone)]
pub struct MockEmbeddingBackend {
    dimension: usize,
    scripted_errors: Arc<Mutex<VecDeque<String>>>,
    texts: Arc<Mutex<Vec<String>>>,
}

impl MockEmbeddingBackend {
    /// Create a mock producing vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            scripted_errors: Arc::new(Mutex::new(VecDeque::new())),
            texts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue an error to be returned before any successful response.
    pub fn push_error(&self, message: impl Into<String>) {
        self.scripted_errors
            .lock()
            .unwrap()
            .push_back(message.into());
    }

    /// All texts received so far.
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingBackend for MockEmbeddingBackend {
    async fn embed(&self, text: &str) -> Result<Vector> {
        self.texts.lock().unwrap().push(text.to_string());
        if let Some(message) = self.scripted_errors.lock().unwrap().pop_front() {
            return Err(Error::Embedding(message));
        }
        // Deterministic: seed every component from the text length.
        let seed = (text.len() % 97) as f32 / 97.0;
        Ok(Vector::from(vec![seed; self.dimension]))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "mock-embedding"
    }
}
