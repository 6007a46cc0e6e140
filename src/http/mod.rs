//! HTTP session and retry policy.

mod retry;
mod session;

pub use retry::{
    DEFAULT_BACKOFF_FACTOR, DEFAULT_INITIAL_DELAY, DEFAULT_MAX_RETRIES, RetryPolicy, Retryable,
    with_retry,
};
pub use session::{AuthState, Session};
