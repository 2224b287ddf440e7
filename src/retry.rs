//! Bounded retry with linear backoff, applied around the request policy

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::config::{DEFAULT_MAX_RETRIES, RETRY_BASE_DELAY_MS};
use crate::error::RequestError;

/// Re-runs a request up to `max_attempts` times, waiting
/// `base_delay * attempt_number` between attempts (1s, 2s, ...).
///
/// Only Maven lookups are wrapped with this today; the search endpoint
/// fails transiently often enough to warrant it.
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::from_millis(RETRY_BASE_DELAY_MS),
        }
    }

    #[cfg(test)]
    fn with_delay(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Runs `op` until it succeeds or attempts are exhausted, re-raising the
    /// last error unchanged. An absent resource (`Ok(None)`) is a legitimate
    /// outcome and is never retried.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<Option<T>, RequestError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, RequestError>>,
    {
        let mut attempt = 1u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_attempts => return Err(e),
                Err(e) => {
                    let delay = self.base_delay * attempt;
                    warn!(
                        "Request failed (attempt {}/{}), retrying in {:?}: {}",
                        attempt, self.max_attempts, delay, e
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}
