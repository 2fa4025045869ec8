//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to serve collection pages (and, in one case, the
//! embeddings API) and run the full pipeline end-to-end into a temp directory.

use async_trait::async_trait;
use hadith_scrape::config::{
    Config, EmbeddingConfig, FirstFailure, OutputConfig, RetryConfig, SourceConfig,
};
use hadith_scrape::crawler::{scrape, Pipeline};
use hadith_scrape::embedding::{EmbeddingBackend, EmbeddingError, OpenAiBackend};
use hadith_scrape::logging::RunLog;
use hadith_scrape::model::BookRecord;
use hadith_scrape::ScrapeError;
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXED_VECTOR: [f32; 4] = [0.125, -0.5, 0.75, 1.0];

/// Embedding service stub returning the same vector for every input
struct FixedBackend;

#[async_trait]
impl EmbeddingBackend for FixedBackend {
    async fn embed(&self, _input: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(FIXED_VECTOR.to_vec())
    }

    fn model(&self) -> &str {
        "fixed"
    }
}

/// Creates a test configuration for a collection served by `server_uri`
fn create_test_config(server_uri: &str, data_dir: &Path) -> Config {
    Config {
        source: SourceConfig {
            base_url: format!("{}/ahmad", server_uri),
            request_timeout_secs: Some(10),
            user_agent: "TestBot/1.0".to_string(),
        },
        embedding: EmbeddingConfig {
            api_key: Some("sk-test".to_string()),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_base: format!("{}/v1", server_uri),
            model: "text-embedding-ada-002".to_string(),
            max_input_chars: 8191,
            throttle_ms: 0,
            retry: RetryConfig {
                max_retries: 3,
                delay_ms: 10,
                backoff_multiplier: 1.0,
                max_delay_ms: 10,
                on_first_failure: FirstFailure::Retry,
            },
        },
        output: OutputConfig {
            data_dir: data_dir.to_string_lossy().into_owned(),
            log_file: "scraper.log".to_string(),
        },
    }
}

fn index_page(books: &[(&str, &str, &str)]) -> String {
    let entries: String = books
        .iter()
        .map(|(number, english, arabic)| {
            format!(
                r#"<a href="/ahmad/{number}"><div class="book_title">
                    <div class="title_number">{number}</div>
                    <div class="english_book_name">{english}</div>
                    <div class="arabic_book_name">{arabic}</div>
                </div></a>"#
            )
        })
        .collect();
    format!("<html><head><title>Musnad Ahmad</title></head><body>{entries}</body></html>")
}

fn book_page(book: &str, hadiths: &[(&str, &str, u32)]) -> String {
    let entries: String = hadiths
        .iter()
        .map(|(english, arabic, number)| {
            format!(
                r#"<div class="actualHadithContainer">
                    <div class="text_details"><p>{english}</p></div>
                    <div class="arabic_hadith_full">{arabic}</div>
                    <table class="hadith_reference">
                        <tr><td>Reference</td><td>&nbsp;:&nbsp;Musnad Ahmad {number}</td></tr>
                        <tr><td>In-book reference</td><td>&nbsp;:&nbsp;Book {book}, Hadith {number}</td></tr>
                    </table>
                </div>"#
            )
        })
        .collect();
    format!("<html><body>{entries}</body></html>")
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn mount_two_book_collection(server: &MockServer) {
    mount_page(
        server,
        "/ahmad",
        index_page(&[
            ("1", "The Book of the Rightly Guided Caliphs", "كتاب الخلفاء الراشدين"),
            ("2", "The Book of the Ten", "مسند العشرة المبشرين بالجنة"),
        ]),
    )
    .await;
    mount_page(
        server,
        "/ahmad/1",
        book_page(
            "1",
            &[
                ("Narrated Abu Bakr", "حدثنا أبو بكر", 1),
                ("Narrated Umar", "حدثنا عمر", 2),
            ],
        ),
    )
    .await;
    mount_page(
        server,
        "/ahmad/2",
        book_page(
            "2",
            &[
                ("Narrated Uthman", "حدثنا عثمان", 3),
                ("Narrated Ali", "حدثنا علي", 4),
            ],
        ),
    )
    .await;
}

fn read_book(path: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).expect("book file should exist");
    serde_json::from_str(&content).expect("book file should be valid JSON")
}

#[tokio::test]
async fn test_two_books_end_to_end() {
    let server = MockServer::start().await;
    mount_two_book_collection(&server).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    let books = scrape(&config, FixedBackend).await.expect("scrape should succeed");

    assert_eq!(books.len(), 2);

    let first = dir
        .path()
        .join("01_The Book of the Rightly Guided Caliphs.json");
    let second = dir.path().join("02_The Book of the Ten.json");

    for (file, number) in [(&first, "1"), (&second, "2")] {
        let json = read_book(file);
        assert_eq!(json["book_number"], number);
        assert_eq!(json["book_link"], format!("{}/ahmad/{}", server.uri(), number));

        let hadiths = json["hadith_data"].as_array().unwrap();
        assert_eq!(hadiths.len(), 2);
        for hadith in hadiths {
            assert_eq!(hadith["english_embeddings"], json!(FIXED_VECTOR));
            assert_eq!(hadith["arabic_embeddings"], json!(FIXED_VECTOR));
            assert_eq!(hadith["book_reference"], format!("Book {}", number));
        }
    }

    let second_book: BookRecord =
        serde_json::from_str(&std::fs::read_to_string(&second).unwrap()).unwrap();
    assert_eq!(second_book, books[1]);

    let hadiths = books[0].hadith_data.as_ref().unwrap();
    assert_eq!(hadiths[0].english, "Narrated Abu Bakr");
    assert_eq!(hadiths[0].arabic, "حدثنا أبو بكر");
    assert_eq!(hadiths[0].reference, "Musnad Ahmad 1");
    assert_eq!(hadiths[1].hadith_number.as_deref(), Some("Hadith 2"));
}

#[tokio::test]
async fn test_missing_book_page_aborts_after_first_book() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/ahmad",
        index_page(&[("1", "Purification", "الطهارة"), ("2", "Prayer", "الصلاة")]),
    )
    .await;
    mount_page(
        &server,
        "/ahmad/1",
        book_page("1", &[("Narrated Aisha", "حدثتنا عائشة", 1)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/ahmad/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    let err = scrape(&config, FixedBackend).await.unwrap_err();

    match err {
        ScrapeError::HttpStatus { url, status } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/ahmad/2"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(dir.path().join("01_Purification.json").exists());
    assert!(!dir.path().join("02_Prayer.json").exists());
}

#[tokio::test]
async fn test_malformed_markup_aborts() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/ahmad",
        r#"<div class="book_title"><div class="title_number">1</div></div>"#.to_string(),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    let err = scrape(&config, FixedBackend).await.unwrap_err();

    assert!(matches!(err, ScrapeError::Extract(_)));
}

#[tokio::test]
async fn test_openai_backend_with_retry_and_run_log() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/ahmad",
        index_page(&[("7", "Chapters", "أبواب")]),
    )
    .await;
    mount_page(
        &server,
        "/ahmad/7",
        book_page("7", &[("Narrated Ibn Abbas", "حدثنا ابن عباس", 70)]),
    )
    .await;

    // The first embeddings call fails, every later one succeeds
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"index": 0, "embedding": [0.5, 0.5]}]
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    let api_key = config.embedding.resolve_api_key().unwrap();
    let backend = OpenAiBackend::new(&config.embedding, &api_key).unwrap();

    let run_log = RunLog::open(dir.path(), &config.output.log_file, None).unwrap();
    let mut pipeline = Pipeline::new(&config, backend).unwrap();
    let books = run_log.scope(pipeline.run()).await.unwrap();

    let hadith = &books[0].hadith_data.as_ref().unwrap()[0];
    assert_eq!(hadith.english_embeddings, Some(vec![0.5, 0.5]));
    assert_eq!(hadith.arabic_embeddings, Some(vec![0.5, 0.5]));
    assert_eq!(pipeline.stats().embedding.retries, 1);
    assert_eq!(pipeline.stats().missing_embeddings, 0);

    let json = read_book(&dir.path().join("07_Chapters.json"));
    assert_eq!(json["hadith_data"][0]["hadith_number"], "Hadith 70");

    let log = std::fs::read_to_string(dir.path().join("scraper.log")).unwrap();
    assert!(log.contains("Scraping started..."));
    assert!(log.contains("Embedding failed"));
    assert!(log.contains("Scraping finished. Scraped 1 books."));
}
