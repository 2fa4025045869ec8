//! Run statistics
//!
//! Counters collected while the pipeline runs, printed once it finishes.

use crate::embedding::EmbeddingStats;
use chrono::{DateTime, Utc};

/// Summary of one scrape run
#[derive(Debug, Clone)]
pub struct RunStatistics {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished, if it did
    pub finished_at: Option<DateTime<Utc>>,

    /// Books listed on the index page
    pub books_found: u64,

    /// Books written to disk
    pub books_persisted: u64,

    /// Hadiths extracted across all books
    pub hadiths: u64,

    /// Embeddings left absent (skipped or retries exhausted)
    pub missing_embeddings: u64,

    /// Counters from the embedding client
    pub embedding: EmbeddingStats,
}

impl RunStatistics {
    /// Starts a fresh set of counters stamped with the current time
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            books_found: 0,
            books_persisted: 0,
            hadiths: 0,
            missing_embeddings: 0,
            embedding: EmbeddingStats::default(),
        }
    }

    /// Marks the run as finished now
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Formats statistics as a short plain-text report
pub fn format_statistics(stats: &RunStatistics) -> String {
    let mut out = String::new();

    out.push_str("=== Scrape Statistics ===\n\n");
    out.push_str(&format!("Started: {}\n", stats.started_at.to_rfc3339()));
    if let Some(finished) = stats.finished_at {
        out.push_str(&format!("Finished: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = stats.duration_seconds() {
        out.push_str(&format!("Duration: {} seconds\n", duration));
    }

    out.push_str(&format!(
        "\nBooks: {} found, {} persisted\n",
        stats.books_found, stats.books_persisted
    ));
    out.push_str(&format!("Hadiths: {}\n", stats.hadiths));

    out.push_str("\nEmbeddings:\n");
    out.push_str(&format!("  Requested: {}\n", stats.embedding.requests));
    out.push_str(&format!(
        "  First-attempt failures: {}\n",
        stats.embedding.first_attempt_failures
    ));
    out.push_str(&format!("  Retries: {}\n", stats.embedding.retries));
    out.push_str(&format!("  Truncated: {}\n", stats.embedding.truncations));
    out.push_str(&format!("  Missing: {}\n", stats.missing_embeddings));

    out
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &RunStatistics) {
    print!("{}", format_statistics(stats));
}
