use crate::error::LedgerError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Fixed-backoff retry of transient server errors
///
/// Only `LedgerError::Server` is retried; every other error is returned to
/// the caller unchanged. With `max_retries` unset the request is retried
/// until it stops failing with a server error.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub backoff: Duration,
    pub max_retries: Option<u32>,
}

impl RetryPolicy {
    pub fn new(backoff: Duration, max_retries: Option<u32>) -> Self {
        Self {
            backoff,
            max_retries,
        }
    }

    /// Run `op` until it succeeds, fails permanently, or retries run out
    ///
    /// # Arguments
    /// * `what` - Short description of the request, for logs
    /// * `op` - Produces a fresh request future per attempt
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, LedgerError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LedgerError>>,
    {
        let mut retries = 0u32;
        loop {
            match op().await {
                Err(e) if e.is_retryable() => {
                    if self.max_retries.is_some_and(|max| retries >= max) {
                        return Err(LedgerError::RetriesExhausted {
                            attempts: retries + 1,
                            last: Box::new(e),
                        });
                    }
                    retries += 1;
                    warn!(
                        "{} failed ({}), retry #{} in {:?}",
                        what, e, retries, self.backoff
                    );
                    sleep(self.backoff).await;
                }
                other => return other,
            }
        }
    }
}
