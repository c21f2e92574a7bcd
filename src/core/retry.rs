//! Bounded exponential backoff around a single fallible async operation.
//!
//! Only failures that report themselves as rate limited are retried. Every
//! other failure, and the last rate-limited failure once the budget is
//! spent, is returned to the caller unchanged.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::core::error::RequestError;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

/// Failures that can tell the executor whether another attempt is worthwhile.
pub trait RetrySignal {
    fn is_retryable(&self) -> bool;
}

impl RetrySignal for RequestError {
    fn is_retryable(&self) -> bool {
        // Transport failures are not retried; see DESIGN.md.
        self.is_rate_limited()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
        }
    }

    /// Delay before each retry, in order. Doubles without jitter or cap.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let initial = self.initial_delay;
        (0..self.max_retries).map(move |retry| initial.saturating_mul(1u32 << retry.min(31)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_INITIAL_DELAY)
    }
}

/// Run `operation`, retrying rate-limited failures per `policy`.
///
/// The wait between attempts is a `tokio::time::sleep`, so the task yields
/// to the runtime instead of blocking the thread.
pub async fn execute_with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    E: RetrySignal + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut retries = 0u32;
    let mut delay = policy.initial_delay;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if retries >= policy.max_retries || !err.is_retryable() {
                    return Err(err);
                }

                retries += 1;
                warn!(
                    attempt = retries,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "rate limited; backing off before retry"
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
            }
        }
    }
}
