//! Retry logic with exponential backoff for network operations.

use log::{debug, warn};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Default number of additional attempts after the first one.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Default multiplier applied to the delay after each failed attempt.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

/// Errors that know whether repeating the operation could succeed.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// How often and how patiently an operation is retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay for every following retry.
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration, backoff_factor: f64) -> Self {
        Self {
            max_retries,
            initial_delay,
            backoff_factor,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// True when the delay and factor are usable.
    pub fn is_valid(&self) -> bool {
        !self.initial_delay.is_zero()
            && self.backoff_factor.is_finite()
            && self.backoff_factor > 0.0
    }

    /// Delay slept before retry number `retry` (0-based): `D * F^retry`.
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.backoff_factor.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Total number of times an always-failing operation is invoked.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Executes an async operation, retrying retryable failures with exponential backoff.
///
/// Non-retryable errors are returned immediately. Once the retries are used
/// up, the last error is returned to the caller.
pub async fn with_retry<F, Fut, T, E>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    let mut retry = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !e.is_retryable() {
                    debug!("{}: non-retryable error: {}", operation_name, e);
                    return Err(e);
                }

                if retry >= policy.max_retries {
                    warn!(
                        "{}: giving up after {} attempt(s): {}",
                        operation_name,
                        retry + 1,
                        e
                    );
                    return Err(e);
                }

                let delay = policy.delay_for(retry);
                warn!(
                    "{}: attempt {}/{} failed ({}), retrying in {:.1}s...",
                    operation_name,
                    retry + 1,
                    policy.max_attempts(),
                    e,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                retry += 1;
            }
        }
    }
}
