//! Hadith-Scrape: a hadith collection harvester
//!
//! This crate fetches book and hadith listings from sunnah.com style pages,
//! attaches text embeddings to every hadith and writes one JSON file per book.

pub mod config;
pub mod crawler;
pub mod embedding;
pub mod logging;
pub mod model;
pub mod output;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Hadith-Scrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] embedding::EmbeddingError),

    #[error("Failed to write {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing API key: set embedding.api-key or the {0} environment variable")]
    MissingApiKey(String),
}

/// Errors raised while pulling records out of the page markup
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Missing '.{class}' inside '.{container}' #{index}")]
    MissingElement {
        container: &'static str,
        class: &'static str,
        index: usize,
    },

    #[error("Malformed in-book reference: {0:?}")]
    MalformedReference(String),
}

/// Result type alias for Hadith-Scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::Pipeline;
pub use model::{BookRecord, HadithRecord};
