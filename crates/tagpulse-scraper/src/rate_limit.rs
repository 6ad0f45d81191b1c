//! Retry with exponential backoff and jitter.
//!
//! The two scraping paths retry different things:
//!
//! - **suggestions**: rate limiting *and* transport failures are retried —
//!   the ranking site blocks aggressively and a fresh attempt (with a
//!   different User-Agent) often goes through;
//! - **counts**: only rate limiting (HTTP 429) is retried; any other
//!   failure on the count path degrades to zero immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Which errors are worth another attempt on a given path.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RetryPolicy {
    /// Retry 429 and network-level failures (suggestion path).
    TransientAndRateLimit,
    /// Retry 429 only (count path).
    RateLimitOnly,
}

impl RetryPolicy {
    fn is_retriable(self, err: &ScraperError) -> bool {
        match self {
            Self::TransientAndRateLimit => matches!(
                err,
                ScraperError::RateLimited { .. } | ScraperError::Http(_)
            ),
            Self::RateLimitOnly => matches!(err, ScraperError::RateLimited { .. }),
        }
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on errors
/// the `policy` considers retriable.
///
/// Backoff before the n-th retry is `backoff_base_ms * 2^(n-1)` milliseconds
/// with ±25% jitter, capped at 60s. Non-retriable errors and exhaustion
/// return the last error.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !policy.is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient scrape failure — retrying after backoff"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
