use crate::config::types::{Config, EmbeddingConfig, OutputConfig, RetryConfig, SourceConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_embedding_config(&config.embedding)?;
    validate_retry_config(&config.embedding.retry)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the collection source
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    validate_http_url(&config.base_url)?;

    if config.request_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1 when set".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates embedding service settings
fn validate_embedding_config(config: &EmbeddingConfig) -> Result<(), ConfigError> {
    validate_http_url(&config.api_base)?;

    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation("model cannot be empty".to_string()));
    }

    if config.max_input_chars == 0 {
        return Err(ConfigError::Validation(
            "max_input_chars must be >= 1".to_string(),
        ));
    }

    if config.api_key.is_none() && config.api_key_env.trim().is_empty() {
        return Err(ConfigError::Validation(
            "api_key_env cannot be empty when api_key is not set".to_string(),
        ));
    }

    Ok(())
}

/// Validates the retry policy
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if !config.backoff_multiplier.is_finite() || config.backoff_multiplier < 1.0 {
        return Err(ConfigError::Validation(format!(
            "backoff_multiplier must be a finite value >= 1.0, got {}",
            config.backoff_multiplier
        )));
    }

    if config.max_delay_ms < config.delay_ms {
        return Err(ConfigError::Validation(format!(
            "max_delay_ms ({}) must be >= delay_ms ({})",
            config.max_delay_ms, config.delay_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "data_dir cannot be empty".to_string(),
        ));
    }

    let log_file = config.log_file.trim();
    if log_file.is_empty() || log_file.contains('/') || log_file.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "log_file must be a plain file name, got '{}'",
            config.log_file
        )));
    }

    Ok(())
}

/// Requires an absolute http(s) URL
fn validate_http_url(raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{}: scheme must be http or https",
            raw
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!("{}: missing host", raw)));
    }

    Ok(())
}
