//! # sous-inference
//!
//! Outbound inference clients for the sous recipe service: a text
//! generation client and an embedding client, both speaking the
//! OpenAI-compatible wire format over a shared fixed-delay retry helper.
//!
//! The embedding client carries an explicit bypass mode for tests; the
//! `mock` module provides fully scripted in-process backends.

pub mod embedding;
pub mod generation;
pub mod mock;
pub mod retry;

pub use embedding::{EmbeddingConfig, EmbeddingMode, HttpEmbeddingClient};
pub use generation::{GenerationConfig, HttpGenerationClient};
pub use mock::{MockEmbeddingBackend, MockGenerationBackend};
pub use retry::{retry, RetryPolicy};
