//! Retry policy for embedding calls

use crate::config::{FirstFailure, RetryConfig};
use std::time::Duration;

/// When and how long to wait before retrying a failed embedding call
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt; `None` retries forever
    pub max_retries: Option<u32>,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Delay growth factor between retries
    pub multiplier: f64,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Handling of a failed first attempt
    pub on_first_failure: FirstFailure,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: (config.max_retries > 0).then_some(config.max_retries),
            initial_delay: Duration::from_millis(config.delay_ms),
            multiplier: config.backoff_multiplier,
            max_delay: Duration::from_millis(config.max_delay_ms),
            on_first_failure: config.on_first_failure,
        }
    }
}

impl RetryPolicy {
    /// Fixed-delay policy that never gives up
    pub fn unbounded(delay: Duration) -> Self {
        Self {
            max_retries: None,
            initial_delay: delay,
            multiplier: 1.0,
            max_delay: delay,
            on_first_failure: FirstFailure::Retry,
        }
    }

    /// Whether another retry is allowed after `retries_done` retries
    pub fn allows_retry(&self, retries_done: u32) -> bool {
        self.max_retries.map_or(true, |max| retries_done < max)
    }

    /// Delay to wait before retry number `retry` (0-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        if self.multiplier <= 1.0 {
            return self.initial_delay.min(self.max_delay);
        }

        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let scaled = self.initial_delay.as_nanos() as f64 * self.multiplier.powi(exponent);
        if !scaled.is_finite() || scaled >= self.max_delay.as_nanos() as f64 {
            return self.max_delay;
        }

        Duration::from_nanos(scaled as u64)
    }
}
