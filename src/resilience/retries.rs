//! Retry logic.
//!
//! # Responsibilities
//! - Retry an attempt while the classifier calls its failure transient
//! - Enforce a fixed attempt budget per call site
//! - Sleep between attempts according to the configured strategy
//!
//! # Design Decisions
//! - Never used for side-effecting calls (publish)
//! - Attempt counting lives here, so call sites cannot drift apart
//! - Exhausting the budget returns the last (transient) failure unchanged

use std::future::Future;
use std::time::Duration;

use crate::config::{BackoffStrategy, RetryConfig};
use crate::error::ApiFailure;
use crate::observability::metrics;
use crate::resilience::backoff::backoff_for;

/// Attempt budget and delay policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub delay_ms: u64,
    pub strategy: BackoffStrategy,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Single attempt, no retry.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to sleep after the `attempt`-th failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        backoff_for(self.strategy, attempt, self.delay_ms, self.max_delay_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay_ms: config.delay_ms,
            strategy: config.strategy,
            max_delay_ms: config.max_delay_ms,
        }
    }
}

/// Run `attempt` until it succeeds, fails non-transiently, or the budget runs out.
pub async fn retry_transient<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &'static str,
    mut attempt: F,
) -> Result<T, ApiFailure>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ApiFailure>>,
{
    let mut n = 1;
    loop {
        match attempt(n).await {
            Ok(value) => return Ok(value),
            Err(failure) if failure.is_transient() && n < policy.max_attempts => {
                let delay = policy.delay_after(n);
                tracing::warn!(
                    operation = operation,
                    attempt = n,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Transient upstream error, retrying"
                );
                metrics::record_retry(operation);
                tokio::time::sleep(delay).await;
                n += 1;
            }
            Err(failure) => {
                if failure.is_transient() {
                    tracing::warn!(
                        operation = operation,
                        attempts = n,
                        "Retry budget exhausted on transient upstream error"
                    );
                }
                return Err(failure);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay_ms: 1,
            strategy: BackoffStrategy::Fixed,
            max_delay_ms: 1,
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.delay_after(1), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let calls = AtomicU32::new(0);
        let result = retry_transient(&fast_policy(2), "test", |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(ApiFailure::transient("busy"))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_budget_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_transient(&fast_policy(2), "test", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ApiFailure::transient("busy")) }
        })
        .await;

        assert!(result.unwrap_err().is_transient());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_transient(&fast_policy(5), "test", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ApiFailure::credential_expired("reconnect")) }
        })
        .await;

        assert!(!result.unwrap_err().is_transient());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_attempt_numbers_passed_through() {
        let seen = std::sync::Mutex::new(Vec::new());
        let _: Result<(), _> = retry_transient(&fast_policy(3), "test", |n| {
            seen.lock().unwrap().push(n);
            async { Err(ApiFailure::transient("busy")) }
        })
        .await;
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }
}
