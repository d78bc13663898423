//! Outer-level retries around single API calls
//!
//! Every translator wraps its API call in [`retry_transient`], which retries
//! the error kinds named by a [`RetryOn`] set with exponential backoff until
//! an operation-specific ceiling.

use crate::error::{CloudError, ErrorKind, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::warn;

/// Retry configuration for provider operations
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts; unbounded (deadline only) when `None`
    pub max_attempts: Option<u32>,

    /// Initial delay between retries
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: f64,

    /// Total time budget across all attempts
    pub timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::mutation()
    }
}

impl RetryConfig {
    /// Create/update/delete calls: 5 minute ceiling.
    pub fn mutation() -> Self {
        Self {
            max_attempts: None,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            timeout: Duration::from_secs(300),
        }
    }

    /// Single-resource reads: 60 second ceiling.
    pub fn read() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            ..Self::mutation()
        }
    }

    /// Data-source listings: 30 second ceiling.
    pub fn list() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_delay: Duration::from_secs(10),
            ..Self::mutation()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Delay before retry number `attempt` (0-indexed), capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let millis = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt.min(i32::MAX as u32) as i32);
        let capped = millis.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }
}

/// Outcome of a single attempt that failed.
#[derive(Debug)]
pub enum RetryError {
    /// Try again after a delay
    Retryable(CloudError),
    /// Give up and surface the error
    NonRetryable(CloudError),
}

/// Set of error kinds worth retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOn {
    kinds: Vec<ErrorKind>,
}

impl RetryOn {
    /// Only rate limiting.
    pub fn throttling() -> Self {
        Self {
            kinds: vec![ErrorKind::Throttled],
        }
    }

    pub fn kinds(kinds: &[ErrorKind]) -> Self {
        Self {
            kinds: kinds.to_vec(),
        }
    }

    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.kinds.contains(&kind)
    }
}

impl Default for RetryOn {
    fn default() -> Self {
        Self::throttling()
    }
}

/// Run `f` until it succeeds, fails non-retryably, or the budget runs out.
pub async fn retry<T, F, Fut>(config: &RetryConfig, operation: &str, mut f: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, RetryError>>,
{
    let deadline = Instant::now() + config.timeout;
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        let error = match f().await {
            Ok(value) => return Ok(value),
            Err(RetryError::NonRetryable(e)) => return Err(e),
            Err(RetryError::Retryable(e)) => e,
        };

        let now = Instant::now();
        let out_of_attempts = config.max_attempts.is_some_and(|max| attempt >= max);
        if out_of_attempts || now >= deadline {
            return Err(CloudError::RetryExhausted {
                operation: operation.to_string(),
                attempts: attempt,
                last_error: Box::new(error),
            });
        }

        let delay = config.delay_for_attempt(attempt - 1).min(deadline - now);
        warn!(
            "{} attempt {} failed ({}), retrying in {:?}",
            operation, attempt, error, delay
        );
        sleep(delay).await;
    }
}

/// Like [`retry`], deciding retryability from the error's [`ErrorKind`].
pub async fn retry_transient<T, F, Fut>(
    config: &RetryConfig,
    retry_on: &RetryOn,
    operation: &str,
    mut f: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    retry(config, operation, || {
        let fut = f();
        async move {
            fut.await.map_err(|e| {
                if retry_on.contains(e.kind()) {
                    RetryError::Retryable(e)
                } else {
                    RetryError::NonRetryable(e)
                }
            })
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_delay_calculation() {
        let config = RetryConfig {
            max_attempts: Some(5),
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10000),
            backoff_multiplier: 2.0,
            timeout: Duration::from_secs(60),
        };

        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(1000));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(2000));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(4000));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(8000));
        assert_eq!(config.delay_for_attempt(4), Duration::from_millis(10000)); // capped at max
    }

    #[test]
    fn test_presets() {
        assert_eq!(RetryConfig::mutation().timeout, Duration::from_secs(300));
        assert_eq!(RetryConfig::read().timeout, Duration::from_secs(60));
        assert_eq!(RetryConfig::list().timeout, Duration::from_secs(30));
        assert!(RetryConfig::default().max_attempts.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_throttling_until_success() {
        let calls = AtomicU32::new(0);
        let result = retry_transient(
            &RetryConfig::mutation(),
            &RetryOn::throttling(),
            "CreateSecurityGroup",
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(CloudError::api("CreateSecurityGroup", "RequestLimitExceeded"))
                    } else {
                        Ok("sg-1")
                    }
                }
            },
        )
        .await;

        assert_eq!(result.unwrap(), "sg-1");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_kind_surfaces_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_transient(
            &RetryConfig::mutation(),
            &RetryOn::throttling(),
            "DeleteSecurityGroup",
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(CloudError::api("DeleteSecurityGroup", "DependencyViolation")) }
            },
        )
        .await;

        assert!(matches!(result, Err(CloudError::Api { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_after_ceiling() {
        let config = RetryConfig::list();
        let started = Instant::now();
        let result: Result<()> = retry_transient(
            &config,
            &RetryOn::kinds(&[ErrorKind::Throttled, ErrorKind::Conflict]),
            "ReadPublicIps",
            || async { Err(CloudError::api("ReadPublicIps", "Conflict")) },
        )
        .await;

        match result {
            Err(CloudError::RetryExhausted {
                operation,
                last_error,
                ..
            }) => {
                assert_eq!(operation, "ReadPublicIps");
                assert_eq!(last_error.kind(), ErrorKind::Conflict);
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
        assert!(started.elapsed() >= config.timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_attempts() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig::read().with_max_attempts(2);
        let result: Result<()> = retry(&config, "ReadVmsState", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(RetryError::Retryable(CloudError::Http("reset".to_string()))) }
        })
        .await;

        assert!(matches!(
            result,
            Err(CloudError::RetryExhausted { attempts: 2, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
