//! Exponential backoff for remote theme calls

use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// How often and how patiently a failed call is repeated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Extra attempts after the first one
    pub max_retries: usize,
    /// Pause before the first retry, in milliseconds
    pub initial_delay_ms: u64,
    /// Upper bound for any pause, in milliseconds
    pub max_delay_ms: u64,
    /// Factor applied to the pause after each retry
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: 2, initial_delay_ms: 100, max_delay_ms: 5_000, multiplier: 2.0 }
    }
}

impl RetryConfig {
    /// Default pauses with `max_retries` extra attempts
    pub fn new(max_retries: usize) -> Self {
        Self { max_retries, ..Default::default() }
    }

    /// No retries at all
    pub fn disabled() -> Self {
        Self::new(0)
    }

    /// Builder-style first pause
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Builder-style pause cap
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Builder-style growth factor
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Pause before retry number `retry` (0-based)
    pub fn delay_for(&self, retry: usize) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let grown = self.initial_delay_ms as f64 * self.multiplier.max(1.0).powi(exponent);
        let capped = grown.min(self.max_delay_ms as f64);
        Duration::from_millis(capped as u64)
    }
}

/// Run `operation` until it succeeds, `should_retry` rejects its error, or
/// the retries are used up
///
/// Returns the error of the last attempt.
pub async fn retry<F, Fut, T, E>(
    config: &RetryConfig,
    should_retry: impl Fn(&E) -> bool,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut retries = 0;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retries >= config.max_retries || !should_retry(&err) {
            return Err(err);
        }

        let pause = config.delay_for(retries);
        retries += 1;
        tracing::debug!(retry = retries, pause_ms = pause.as_millis() as u64, "retrying theme API call");
        tokio::time::sleep(pause).await;
    }
}

/// [`retry`] restricted to transport failures and retryable statuses
pub async fn network_retry<F, Fut, T>(config: &RetryConfig, operation: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    retry(config, ClientError::is_network_error, operation).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn quick(max_retries: usize) -> RetryConfig {
        RetryConfig::new(max_retries).with_initial_delay(Duration::from_millis(1))
    }

    // ==========================================================================
    // Delays
    // ==========================================================================

    #[test]
    fn test_delays_grow_then_cap() {
        let config = RetryConfig::new(5)
            .with_initial_delay(Duration::from_millis(50))
            .with_multiplier(3.0)
            .with_max_delay(Duration::from_millis(1_000));

        let delays: Vec<u64> = (0..5).map(|r| config.delay_for(r).as_millis() as u64).collect();
        assert_eq!(delays, vec![50, 150, 450, 1_000, 1_000]);
    }

    #[test]
    fn test_multiplier_below_one_never_shrinks() {
        let config = RetryConfig::default().with_multiplier(0.5);
        assert_eq!(config.delay_for(3), Duration::from_millis(100));
    }

    // ==========================================================================
    // Attempts
    // ==========================================================================

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        let result = retry(&quick(3), |_: &&str| true, move || async move {
            match counter.fetch_add(1, Ordering::SeqCst) {
                0 | 1 => Err("502 from proxy"),
                _ => Ok("saved"),
            }
        })
        .await;

        assert_eq!(result, Ok("saved"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_with_last_error() {
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        let result: Result<(), usize> = retry(&quick(2), |_: &usize| true, move || async move {
            Err(counter.fetch_add(1, Ordering::SeqCst))
        })
        .await;

        assert_eq!(result, Err(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_disabled_runs_once() {
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let result: Result<(), ClientError> = network_retry(&RetryConfig::disabled(), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::Network("connection reset".into()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejected_theme_is_not_retried() {
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let result: Result<(), ClientError> = network_retry(&quick(2), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::Api { status: 400, message: "Invalid theme".into() })
        })
        .await;

        assert!(matches!(result, Err(ClientError::Api { status: 400, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
