//! HTTP fetcher implementation
//!
//! Page fetches are single GET requests with no retry. A transport failure or
//! a non-success status is returned as an error and ends the run.

use crate::config::SourceConfig;
use crate::ScrapeError;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;

/// Builds the HTTP client used for index and book pages
///
/// # Arguments
///
/// * `config` - The source configuration (user agent, optional timeout)
///
/// # Example
///
/// ```no_run
/// use hadith_scrape::config::SourceConfig;
/// use hadith_scrape::crawler::build_http_client;
///
/// let config = SourceConfig {
///     base_url: "https://sunnah.com/ahmad".to_string(),
///     request_timeout_secs: None,
///     user_agent: "hadith-scrape/0.1".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &SourceConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches a page body
///
/// # Returns
///
/// * `Ok(String)` - The response body of a 2xx response
/// * `Err(ScrapeError::Http)` - The request or body read failed
/// * `Err(ScrapeError::HttpStatus)` - The server answered with a non-2xx status
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, ScrapeError> {
    tracing::debug!("GET {}", url);

    let response = client.get(url).send().await.map_err(|source| ScrapeError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| ScrapeError::Http {
        url: url.to_string(),
        source,
    })
}

/// Fetches a page and parses it into an HTML document
pub async fn fetch_document(client: &Client, url: &str) -> Result<Html, ScrapeError> {
    let body = fetch_page(client, url).await?;
    Ok(Html::parse_document(&body))
}
