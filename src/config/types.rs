use serde::Deserialize;

/// Main configuration structure for Hadith-Scrape
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub embedding: EmbeddingConfig,
    pub output: OutputConfig,
}

/// Which collection to scrape and how to reach it
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Collection index URL, e.g. `https://sunnah.com/ahmad`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Optional request timeout for page fetches (seconds). Unset means none.
    #[serde(rename = "request-timeout-secs", default)]
    pub request_timeout_secs: Option<u64>,

    /// User agent sent with page fetches
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Embedding service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    /// API key; when absent the key is read from `api_key_env`
    #[serde(rename = "api-key", default)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,

    /// Base URL of the OpenAI-compatible API
    #[serde(rename = "api-base", default = "default_api_base")]
    pub api_base: String,

    /// Embedding model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Character ceiling applied to inputs on retry
    #[serde(rename = "max-input-chars", default = "default_max_input_chars")]
    pub max_input_chars: usize,

    /// Pause after every embedding call (milliseconds)
    #[serde(rename = "throttle-ms", default = "default_throttle_ms")]
    pub throttle_ms: u64,

    #[serde(default)]
    pub retry: RetryConfig,
}

/// Retry behavior for failed embedding calls
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt; 0 retries forever
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Delay growth factor between retries
    #[serde(rename = "backoff-multiplier", default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Upper bound for the retry delay (milliseconds)
    #[serde(rename = "max-delay-ms", default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// What to do when the very first attempt fails
    #[serde(rename = "on-first-failure", default)]
    pub on_first_failure: FirstFailure,
}

/// Handling of a failed first embedding attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FirstFailure {
    /// Enter the retry loop
    #[default]
    Retry,
    /// Give up immediately and record an absent embedding
    Skip,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the per-book JSON files and the run log
    #[serde(rename = "data-dir")]
    pub data_dir: String,

    /// File name of the run log inside `data_dir`
    #[serde(rename = "log-file", default = "default_log_file")]
    pub log_file: String,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay_ms: default_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_delay_ms: default_max_delay_ms(),
            on_first_failure: FirstFailure::default(),
        }
    }
}

fn default_user_agent() -> String {
    format!("hadith-scrape/{}", env!("CARGO_PKG_VERSION"))
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_max_input_chars() -> usize {
    8191
}

fn default_throttle_ms() -> u64 {
    1000
}

fn default_max_retries() -> u32 {
    10
}

fn default_delay_ms() -> u64 {
    5000
}

fn default_backoff_multiplier() -> f64 {
    1.0
}

fn default_max_delay_ms() -> u64 {
    60_000
}

fn default_log_file() -> String {
    "scraper.log".to_string()
}
