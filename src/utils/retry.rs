//! Bounded retry with exponential backoff.
//!
//! The default performs no retries: a failed provider query ends the run.

use std::time::Duration;
use tokio::time::sleep;

use crate::report::Reporter;
use crate::sources::SourceError;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for a single delay
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Default backoff with a given number of retries
    pub fn with_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.backoff_multiplier.powf(retry.saturating_sub(1) as f64);
        let secs = self.initial_delay.as_secs_f64() * factor;
        Duration::from_secs_f64(secs.min(self.max_delay.as_secs_f64()))
    }
}

/// Execute an async operation, retrying transient errors up to `max_retries` times.
///
/// Permanent errors (see [`SourceError::is_transient`]) are returned immediately.
pub async fn with_retry<T, F, Fut>(
    config: RetryConfig,
    reporter: &dyn Reporter,
    operation: F,
) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, SourceError>>,
{
    let mut retries = 0;
    let mut operation = operation;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) if error.is_transient() && retries < config.max_retries => {
                retries += 1;
                let delay = config.delay_for(retries);
                reporter.debug(&format!(
                    "transient error ({}), retry {}/{} in {:?}",
                    error, retries, config.max_retries, delay
                ));
                sleep(delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}
