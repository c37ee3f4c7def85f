//! Fixed-delay retry helper shared by the generation and embedding clients.
//!
//! Deliberately simple: a fixed linear delay between attempts, no jitter,
//! no backoff, no circuit breaker. Every attempt is awaited on the caller's
//! task, so dropping the calling future aborts an in-flight attempt.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use sous_core::Result;

/// Retry policy: number of attempts and the fixed delay between them.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total number of attempts (not retries after the first).
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: sous_core::defaults::RETRY_MAX_ATTEMPTS,
            delay: Duration::from_secs(sous_core::defaults::RETRY_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    /// Policy with the given attempt count and no delay. Used in tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay: Duration::ZERO,
        }
    }
}

/// Run `op` up to `policy.max_attempts` times, sleeping `policy.delay`
/// between failed attempts. Returns the first success or the last error.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, component: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;

    for attempt in 1..=policy.max_attempts.max(1) {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = component,
                    attempt = attempt,
                    max_attempts = policy.max_attempts,
                    error = %e,
                    "Attempt failed"
                );
                last_err = Some(e);
                if attempt < policy.max_attempts && !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    Err(last_err.expect("retry ran at least one attempt"))
}
