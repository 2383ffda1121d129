//! The retry strategy trait.

use crate::clock::Sleeper;
use async_trait::async_trait;
use std::error::Error;
use std::future::Future;
use std::time::Duration;

/// A strategy for retrying failed operations with backoff.
///
/// Implementations decide whether an error is worth retrying, how long to
/// wait before the next attempt, and when to give up. Waiting is delegated to
/// a [`Sleeper`] so callers control the clock.
///
/// # Examples
///
/// ```rust
/// use turbobatch_core::clock::NoopSleeper;
/// use turbobatch_core::retry::{BackoffStrategy, ExponentialBackoff};
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backoff = ExponentialBackoff::builder().max_retries(3).build();
///
/// let attempts = Arc::new(AtomicU32::new(0));
/// let result = backoff.execute(&NoopSleeper, || {
///     let attempts = Arc::clone(&attempts);
///     async move {
///         if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
///             Err(std::io::Error::other("retry me"))
///         } else {
///             Ok(42)
///         }
///     }
/// }).await?;
/// assert_eq!(result, 42);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait BackoffStrategy: Send + Sync {
    /// Execute an operation with retry logic.
    ///
    /// The operation is called until it succeeds, returns an error that
    /// [`should_retry`](Self::should_retry) rejects, or the retry budget is
    /// spent. The error from the last attempt is returned on failure.
    async fn execute<F, Fut, T, E>(&self, sleeper: &dyn Sleeper, operation: F) -> Result<T, E>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Error + Send + Sync + 'static,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) if !self.should_retry(&err, attempt) => return Err(err),
                Err(err) if attempt >= self.max_retries() => return Err(err),
                Err(_err) => {
                    if let Some(delay) = self.next_delay(attempt) {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            error = %_err,
                            "Attempt failed, backing off"
                        );
                        sleeper.sleep(delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// Determine if an error is retryable.
    ///
    /// `attempt` is the 0-indexed number of the attempt that just failed.
    /// The default retries everything; override to inspect the concrete
    /// error type via `downcast_ref`.
    fn should_retry(&self, error: &(dyn Error + 'static), attempt: u32) -> bool {
        let _ = (error, attempt);
        true
    }

    /// Delay to wait after failed attempt `attempt` (0-indexed).
    ///
    /// `None` means retry immediately.
    fn next_delay(&self, attempt: u32) -> Option<Duration>;

    /// Maximum number of retries after the initial attempt.
    ///
    /// `max_retries() == 2` means at most three calls in total.
    fn max_retries(&self) -> u32;
}
