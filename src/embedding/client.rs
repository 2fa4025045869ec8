//! Resilient embedding client
//!
//! # Request Flow
//!
//! 1. Call the backend with the full text
//! 2. On failure, consult `RetryPolicy::on_first_failure`
//!    - `Skip` → return `Ok(None)` (absent embedding, no retry)
//!    - `Retry` → enter the retry loop
//! 3. Retry loop: input is cut to the first `max_input_chars` characters when
//!    the text is longer; sleep the policy delay, call again
//! 4. Stop on success, or with `RetriesExhausted` once the policy says so

use crate::embedding::{EmbeddingBackend, EmbeddingError, RetryPolicy};
use crate::config::FirstFailure;

/// Counters kept across every `embed` call of one embedder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbeddingStats {
    /// Texts submitted to `embed`
    pub requests: u64,
    /// Texts whose first attempt failed
    pub first_attempt_failures: u64,
    /// Retry calls made (one delay each)
    pub retries: u64,
    /// Texts retried with truncated input
    pub truncations: u64,
    /// Texts given up on, by policy or exhaustion
    pub abandoned: u64,
}

/// Embedding client with truncation fallback and retry
pub struct Embedder<B> {
    backend: B,
    policy: RetryPolicy,
    max_input_chars: usize,
    stats: EmbeddingStats,
}

impl<B: EmbeddingBackend> Embedder<B> {
    /// Creates an embedder around `backend`
    ///
    /// # Arguments
    ///
    /// * `backend` - The embedding service
    /// * `policy` - Retry policy for failed calls
    /// * `max_input_chars` - Input ceiling applied when retrying
    pub fn new(backend: B, policy: RetryPolicy, max_input_chars: usize) -> Self {
        Self {
            backend,
            policy,
            max_input_chars,
            stats: EmbeddingStats::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn stats(&self) -> EmbeddingStats {
        self.stats
    }

    /// Embeds `text`
    ///
    /// # Returns
    ///
    /// * `Ok(Some(vector))` - An attempt succeeded
    /// * `Ok(None)` - The first attempt failed and the policy is `Skip`
    /// * `Err(EmbeddingError::RetriesExhausted)` - Every allowed retry failed
    pub async fn embed(&mut self, text: &str) -> Result<Option<Vec<f32>>, EmbeddingError> {
        self.stats.requests += 1;

        let first_error = match self.backend.embed(text).await {
            Ok(vector) => return Ok(Some(vector)),
            Err(e) => e,
        };

        self.stats.first_attempt_failures += 1;
        tracing::error!("Embedding failed. Error message: {}", first_error);

        if self.policy.on_first_failure == FirstFailure::Skip {
            self.stats.abandoned += 1;
            tracing::warn!("Recording absent embedding without retry");
            return Ok(None);
        }

        let char_count = text.chars().count();
        let input = if char_count > self.max_input_chars {
            tracing::warn!(
                "Input has {} characters; retrying with the first {}",
                char_count,
                self.max_input_chars
            );
            self.stats.truncations += 1;
            truncate_chars(text, self.max_input_chars)
        } else {
            text
        };

        let mut retries_done: u32 = 0;
        let mut last_error = first_error;

        loop {
            if !self.policy.allows_retry(retries_done) {
                self.stats.abandoned += 1;
                return Err(EmbeddingError::RetriesExhausted {
                    attempts: retries_done + 1,
                    source: Box::new(last_error),
                });
            }

            let delay = self.policy.delay_for(retries_done);
            tokio::time::sleep(delay).await;

            retries_done += 1;
            self.stats.retries += 1;

            match self.backend.embed(input).await {
                Ok(vector) => {
                    tracing::info!("Embedding succeeded after {} retries", retries_done);
                    return Ok(Some(vector));
                }
                Err(e) => {
                    tracing::error!(
                        "Retry {} for embedding failed. Error message: {}",
                        retries_done,
                        e
                    );
                    last_error = e;
                }
            }
        }
    }
}

/// Returns the first `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
