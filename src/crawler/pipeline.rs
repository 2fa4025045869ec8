//! Scrape pipeline - main orchestration logic
//!
//! ```text
//! FetchIndex → ExtractBooks → for each book:
//!     FetchBook → ExtractHadiths → for each hadith:
//!         EmbedEnglish → Sleep → EmbedArabic → Sleep
//!     → AttachHadiths → PersistBook
//! ```
//!
//! Everything runs sequentially. Embedding failures become absent embeddings;
//! any other error aborts the run, leaving earlier book files in place.

use crate::config::Config;
use crate::crawler::extractor::{extract_books, extract_hadiths};
use crate::crawler::fetcher::{build_http_client, fetch_document};
use crate::embedding::{Embedder, EmbeddingBackend, RetryPolicy};
use crate::model::{BookRecord, HadithRecord};
use crate::output::{persist_book, RunStatistics};
use crate::ScrapeError;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

/// Fetches a collection index page and extracts its book listing
///
/// # Example
///
/// ```no_run
/// use hadith_scrape::config::load_config;
/// use hadith_scrape::crawler::{build_http_client, fetch_books};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("ahmad.toml"))?;
/// let client = build_http_client(&config.source)?;
/// for book in fetch_books(&client, &config.source.base_url).await? {
///     println!("{} {}", book.book_number, book.english_name);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn fetch_books(client: &Client, base_url: &str) -> Result<Vec<BookRecord>, ScrapeError> {
    let document = fetch_document(client, base_url).await?;
    tracing::info!("Extracting book data from website...");
    let books = extract_books(&document, base_url)?;
    tracing::info!("{} books data extracted from website.", books.len());
    Ok(books)
}

/// Main pipeline structure
pub struct Pipeline<B> {
    base_url: String,
    data_dir: PathBuf,
    client: Client,
    embedder: Embedder<B>,
    throttle: Duration,
    stats: RunStatistics,
}

impl<B: EmbeddingBackend> Pipeline<B> {
    /// Creates a new pipeline
    ///
    /// # Arguments
    ///
    /// * `config` - The scrape configuration
    /// * `backend` - The embedding service
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Client built and output directory present
    /// * `Err(ScrapeError)` - Failed to build the client or create the directory
    pub fn new(config: &Config, backend: B) -> Result<Self, ScrapeError> {
        let client = build_http_client(&config.source)?;

        let data_dir = PathBuf::from(&config.output.data_dir);
        std::fs::create_dir_all(&data_dir)?;

        let embedder = Embedder::new(
            backend,
            RetryPolicy::from(&config.embedding.retry),
            config.embedding.max_input_chars,
        );

        Ok(Self {
            base_url: config.source.base_url.clone(),
            data_dir,
            client,
            embedder,
            throttle: Duration::from_millis(config.embedding.throttle_ms),
            stats: RunStatistics::start(),
        })
    }

    /// Statistics of the current (or last) run
    pub fn stats(&self) -> &RunStatistics {
        &self.stats
    }

    pub fn embedder(&self) -> &Embedder<B> {
        &self.embedder
    }

    /// Runs the whole scrape
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<BookRecord>)` - Every book, with hadiths and embeddings attached
    /// * `Err(ScrapeError)` - A fetch, extraction or write failed; the run stopped
    pub async fn run(&mut self) -> Result<Vec<BookRecord>, ScrapeError> {
        self.stats = RunStatistics::start();
        tracing::info!("Scraping started...");
        tracing::info!(
            "Source: {}, model: {}, output: {}",
            self.base_url,
            self.embedder.backend().model(),
            self.data_dir.display()
        );

        let mut books = fetch_books(&self.client, &self.base_url).await?;
        self.stats.books_found = books.len() as u64;

        for book in &mut books {
            tracing::info!("Scraping book: {}...", book.english_name);
            self.scrape_book(book).await?;
            persist_book(&self.data_dir, book)?;
            self.stats.books_persisted += 1;
            tracing::info!("Finished scraping book: {}.", book.english_name);
        }

        self.stats.embedding = self.embedder.stats();
        self.stats.finish();
        tracing::info!("Scraping finished. Scraped {} books.", books.len());

        Ok(books)
    }

    /// Fetches one book page, extracts its hadiths and embeds them
    async fn scrape_book(&mut self, book: &mut BookRecord) -> Result<(), ScrapeError> {
        tracing::info!(
            "Extracting hadith data from book: {}...",
            book.english_name
        );
        let mut hadiths = {
            let document = fetch_document(&self.client, &book.book_link).await?;
            extract_hadiths(&document)?
        };
        tracing::info!(
            "Extracted {} hadiths from book: {}.",
            hadiths.len(),
            book.english_name
        );
        self.stats.hadiths += hadiths.len() as u64;

        for (index, hadith) in hadiths.iter_mut().enumerate() {
            tracing::debug!("Embedding hadith {} of book {}", index + 1, book.book_number);
            self.embed_hadith(hadith).await;
        }

        book.hadith_data = Some(hadiths);
        self.stats.embedding = self.embedder.stats();
        Ok(())
    }

    /// Attaches both embeddings, pausing after each call
    async fn embed_hadith(&mut self, hadith: &mut HadithRecord) {
        hadith.english_embeddings = self.embed_text(&hadith.english).await;
        tokio::time::sleep(self.throttle).await;

        hadith.arabic_embeddings = self.embed_text(&hadith.arabic).await;
        tokio::time::sleep(self.throttle).await;
    }

    async fn embed_text(&mut self, text: &str) -> Option<Vec<f32>> {
        match self.embedder.embed(text).await {
            Ok(Some(vector)) => Some(vector),
            Ok(None) => {
                self.stats.missing_embeddings += 1;
                None
            }
            Err(e) => {
                tracing::warn!("Giving up on embedding, storing null: {}", e);
                self.stats.missing_embeddings += 1;
                None
            }
        }
    }
}
