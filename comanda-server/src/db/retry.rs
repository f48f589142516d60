//! Bounded retry with exponential backoff for the persistence gateway
//!
//! Only errors classified transient (I/O level) are retried. Schema and
//! validation failures surface immediately: retrying them cannot succeed
//! and would only delay the error reaching the caller.

use super::storage::{StorageError, StorageResult};
use std::time::Duration;

/// Retry budget for transient storage failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Backoff before the first retry; doubles on each subsequent retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }
}

/// Run a storage operation under the retry policy.
///
/// The operation is a synchronous closure (redb calls are blocking and
/// fast); only the backoff sleeps are awaited.
pub async fn with_retry<T>(
    policy: &RetryPolicy,
    op: &str,
    mut f: impl FnMut() -> StorageResult<T>,
) -> StorageResult<T> {
    let mut attempt: u32 = 1;
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                let delay = policy.base_delay * 2u32.saturating_pow(attempt - 1);
                tracing::warn!(
                    op,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Transient storage failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                if e.is_transient() {
                    tracing::error!(op, attempts = attempt, error = %e, "Retry budget exhausted");
                }
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transient() -> StorageError {
        StorageError::from(std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout"))
    }

    #[tokio::test]
    async fn test_transient_error_is_retried() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let mut calls = 0;
        let result = with_retry(&policy, "test", || {
            calls += 1;
            if calls < 3 { Err(transient()) } else { Ok(calls) }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_budget_exhaustion_surfaces_error() {
        let policy = RetryPolicy::new(2, Duration::from_millis(1));
        let mut calls = 0;
        let result: StorageResult<()> = with_retry(&policy, "test", || {
            calls += 1;
            Err(transient())
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_non_transient_error_not_retried() {
        let policy = RetryPolicy::new(5, Duration::from_millis(1));
        let mut calls = 0;
        let result: StorageResult<()> = with_retry(&policy, "test", || {
            calls += 1;
            Err(StorageError::OrderNotFound("x".to_string()))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
