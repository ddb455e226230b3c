//! # Resilience Module
//!
//! Bounded-attempt retry for per-item upstream operations. The strategy
//! executor, user synchronisation and KYC upload all run their Hyperwallet
//! calls through a [`RetryPolicy`]; attempt count and delay come from
//! configuration ([`crate::config::RetryConfig`]), never from call sites.
//!
//! Backoff blocks the calling task for the duration of the delay. That is
//! acceptable here: this is batch processing, not request-latency-sensitive
//! work, and the pipeline is sequential by design.

use crate::config::RetryConfig;
use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Bounded-attempt retry policy with a fixed delay between attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            // A policy that never attempts is useless; floor at one attempt.
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, config.delay)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `operation` until it succeeds or the attempt budget is exhausted.
    /// The error of the final attempt is returned; intermediate failures are
    /// logged at `warn`.
    pub async fn run<T, F, Fut>(&self, operation_name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < self.max_attempts => {
                    warn!(
                        operation = operation_name,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = self.delay.as_millis() as u64,
                        %error,
                        "Operation failed, retrying after delay"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConnectorError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn flaky_error() -> ConnectorError {
        ConnectorError::HyperwalletApi {
            status: 500,
            message: "boom".to_string(),
        }
    }

    #[tokio::test]
    async fn succeeds_on_first_attempt_without_delay() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let calls = AtomicU32::new(0);

        let result = policy
            .run("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(42) }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let calls = AtomicU32::new(0);

        let result = policy
            .run("test", || {
                let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if attempt < 3 {
                        Err(flaky_error())
                    } else {
                        Ok("recovered")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn returns_last_error_when_attempts_are_exhausted() {
        let policy = RetryPolicy::new(2, Duration::from_millis(1));
        let calls = AtomicU32::new(0);

        let result: Result<()> = policy
            .run("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(flaky_error()) }
            })
            .await;

        assert!(matches!(
            result,
            Err(ConnectorError::HyperwalletApi { status: 500, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_attempt_policy_is_floored_to_one() {
        let policy = RetryPolicy::new(0, Duration::from_millis(1));

        let result = policy.run("test", || async { Ok(1) }).await;

        assert_eq!(result.unwrap(), 1);
    }
}
