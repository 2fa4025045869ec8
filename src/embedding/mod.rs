//! Embedding module
//!
//! This module turns hadith text into embedding vectors:
//! - `EmbeddingBackend` is a single call to an embedding service
//! - `OpenAiBackend` talks to an OpenAI-compatible `/embeddings` endpoint
//! - `Embedder` wraps a backend with truncation fallback and retry policy

mod client;
mod openai;
mod retry;

pub use client::{truncate_chars, Embedder, EmbeddingStats};
pub use openai::OpenAiBackend;
pub use retry::RetryPolicy;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while requesting embeddings
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Embedding service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("Embedding failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<EmbeddingError>,
    },
}

/// A text-embedding service
///
/// One call, one input, one vector. Retrying is the caller's business.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Embeds `input` and returns its vector
    async fn embed(&self, input: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Model identifier sent with each request
    fn model(&self) -> &str;
}
