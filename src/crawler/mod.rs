//! Crawler module for collection pages
//!
//! This module contains the scraping logic, including:
//! - HTTP fetching of index and book pages
//! - Structural extraction of books and hadiths
//! - The pipeline that embeds hadiths and persists each book

mod extractor;
mod fetcher;
mod pipeline;

pub use extractor::{extract_books, extract_hadiths, parse_reference};
pub use fetcher::{build_http_client, fetch_document, fetch_page};
pub use pipeline::{fetch_books, Pipeline};

use crate::config::Config;
use crate::embedding::EmbeddingBackend;
use crate::model::BookRecord;
use crate::ScrapeError;

/// Runs a complete scrape with the given backend
///
/// This is the main entry point for a scrape. It will:
/// 1. Build the HTTP client and create the output directory
/// 2. Fetch the index page and extract books
/// 3. Fetch every book page and extract hadiths
/// 4. Embed each hadith's English and Arabic text
/// 5. Write one JSON file per book
///
/// # Returns
///
/// * `Ok(Vec<BookRecord>)` - Scrape completed
/// * `Err(ScrapeError)` - Scrape aborted
pub async fn scrape<B: EmbeddingBackend>(
    config: &Config,
    backend: B,
) -> Result<Vec<BookRecord>, ScrapeError> {
    let mut pipeline = Pipeline::new(config, backend)?;
    pipeline.run().await
}
