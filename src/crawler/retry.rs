//! Bounded retry with exponential backoff for page fetches

use crate::FetchError;
use std::future::Future;
use std::time::Duration;

/// HTTP statuses worth retrying
pub const RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Retry budget and backoff schedule
///
/// The delay before retry `n` (0-based) is `base_delay * 2^n`, so the
/// default policy sleeps 0.5 s, 1 s and 2 s before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first try
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay before the given retry (0-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << retry.min(31))
    }
}

/// Returns true for failures that may succeed on a later attempt
///
/// Network failures and the statuses in [`RETRY_STATUSES`] are transient.
/// Other statuses (403, 404, ...) and client build or proxy errors are not.
pub fn is_retriable(err: &FetchError) -> bool {
    match err {
        FetchError::Status { status, .. } => RETRY_STATUSES.contains(status),
        FetchError::Network { .. } => true,
        FetchError::Proxy { .. } | FetchError::Client(_) => false,
    }
}

/// Runs `operation` until it succeeds, fails permanently, or the retry
/// budget is spent; the last error is returned in the latter cases
pub async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !is_retriable(&err) || attempt >= policy.max_retries {
            return Err(err);
        }

        let delay = policy.delay_for(attempt);
        tracing::warn!(
            attempt = attempt + 1,
            max_retries = policy.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Transient fetch error, retrying after backoff"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
