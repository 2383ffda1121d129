//! Exponential backoff with additive jitter.

use super::strategy::BackoffStrategy;
use std::time::Duration;

/// Exponential backoff strategy with additive jitter and a hard cap.
///
/// # Mathematical Formula
///
/// For failed attempt `n` (0-indexed):
/// ```text
/// base_delay  = initial_delay * multiplier^n
/// final_delay = min(base_delay + random[0, jitter), max_delay)
/// ```
///
/// With the defaults (1s initial, x2, 1s jitter, 10s cap) the delay after
/// attempt `n` always falls in `[1000 * 2^n, 1000 * 2^n + 1000)` ms, clamped
/// to 10 000 ms.
///
/// # Examples
///
/// ```rust
/// use turbobatch_core::retry::{BackoffStrategy, ExponentialBackoff};
/// use std::time::Duration;
///
/// let backoff = ExponentialBackoff::builder()
///     .max_retries(5)
///     .initial_delay(Duration::from_millis(100))
///     .max_delay(Duration::from_secs(30))
///     .jitter(Duration::ZERO)
///     .build();
///
/// assert_eq!(backoff.next_delay(2), Some(Duration::from_millis(400)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialBackoff {
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: Duration,
}

impl ExponentialBackoff {
    /// Create a new builder for configuring exponential backoff.
    pub fn builder() -> ExponentialBackoffBuilder {
        ExponentialBackoffBuilder::default()
    }

    /// Delay before jitter and capping for failed attempt `attempt`.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        if secs.is_finite() && secs < self.max_delay.as_secs_f64() {
            Duration::from_secs_f64(secs)
        } else {
            self.max_delay
        }
    }

    /// Upper bound of the additive jitter.
    pub fn jitter(&self) -> Duration {
        self.jitter
    }

    /// The delay cap.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }
}

impl Default for ExponentialBackoff {
    /// Defaults:
    /// - `max_retries`: 2 (three attempts in total)
    /// - `initial_delay`: 1s
    /// - `max_delay`: 10s
    /// - `multiplier`: 2.0
    /// - `jitter`: up to 1s added to every delay
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: Duration::from_secs(1),
        }
    }
}

impl BackoffStrategy for ExponentialBackoff {
    fn next_delay(&self, attempt: u32) -> Option<Duration> {
        let base = self.base_delay(attempt);
        let jittered = if self.jitter.is_zero() {
            base
        } else {
            base + self.jitter.mul_f64(rand::random::<f64>())
        };
        Some(jittered.min(self.max_delay))
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

/// Builder for configuring [`ExponentialBackoff`].
#[derive(Debug, Default)]
pub struct ExponentialBackoffBuilder {
    max_retries: Option<u32>,
    initial_delay: Option<Duration>,
    max_delay: Option<Duration>,
    multiplier: Option<f64>,
    jitter: Option<Duration>,
}

impl ExponentialBackoffBuilder {
    /// Set the maximum number of retries after the first attempt.
    ///
    /// Default: 2
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the delay after the first failure.
    ///
    /// Default: 1s
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Set the cap applied after jitter.
    ///
    /// Default: 10s
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the exponential multiplier. Values below 1.0 are raised to 1.0.
    ///
    /// Default: 2.0
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier.max(1.0));
        self
    }

    /// Set the upper bound of the random delay added to every backoff.
    ///
    /// Default: 1s
    pub fn jitter(mut self, jitter: Duration) -> Self {
        self.jitter = Some(jitter);
        self
    }

    /// Build the `ExponentialBackoff` instance.
    pub fn build(self) -> ExponentialBackoff {
        let defaults = ExponentialBackoff::default();
        ExponentialBackoff {
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            initial_delay: self.initial_delay.unwrap_or(defaults.initial_delay),
            max_delay: self.max_delay.unwrap_or(defaults.max_delay),
            multiplier: self.multiplier.unwrap_or(defaults.multiplier),
            jitter: self.jitter.unwrap_or(defaults.jitter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{NoopSleeper, RecordingSleeper};
    use proptest::prelude::*;
    use std::error::Error;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_exponential_delay_calculation() {
        let backoff = ExponentialBackoff::builder()
            .max_retries(5)
            .initial_delay(Duration::from_millis(100))
            .max_delay(Duration::from_secs(10))
            .jitter(Duration::ZERO)
            .build();

        assert_eq!(backoff.next_delay(0).unwrap(), Duration::from_millis(100));
        assert_eq!(backoff.next_delay(1).unwrap(), Duration::from_millis(200));
        assert_eq!(backoff.next_delay(2).unwrap(), Duration::from_millis(400));
        assert_eq!(backoff.next_delay(3).unwrap(), Duration::from_millis(800));
    }

    #[test]
    fn test_max_delay_cap() {
        let backoff = ExponentialBackoff::default();

        // 1000 * 2^4 = 16s, well past the 10s cap
        for attempt in 4..40 {
            assert_eq!(backoff.next_delay(attempt).unwrap(), Duration::from_secs(10));
        }
        assert_eq!(backoff.next_delay(u32::MAX).unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn test_default_delays_within_jitter_window() {
        let backoff = ExponentialBackoff::default();

        for _ in 0..50 {
            let first = backoff.next_delay(0).unwrap().as_millis();
            assert!((1000..2000).contains(&first), "got {}ms", first);

            let third = backoff.next_delay(2).unwrap().as_millis();
            assert!((4000..5000).contains(&third), "got {}ms", third);

            // 8000 + jitter stays under the cap
            let fourth = backoff.next_delay(3).unwrap().as_millis();
            assert!((8000..=9000).contains(&fourth), "got {}ms", fourth);
        }
    }

    #[test]
    fn test_builder_defaults() {
        let backoff = ExponentialBackoff::builder().build();
        assert_eq!(backoff, ExponentialBackoff::default());
        assert_eq!(backoff.max_retries(), 2);
        assert_eq!(backoff.jitter(), Duration::from_secs(1));
        assert_eq!(backoff.max_delay(), Duration::from_secs(10));
    }

    #[test]
    fn test_multiplier_floor() {
        let backoff = ExponentialBackoff::builder()
            .multiplier(0.5)
            .jitter(Duration::ZERO)
            .build();
        assert_eq!(backoff.next_delay(3).unwrap(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_retry_success_on_third_attempt() {
        let backoff = ExponentialBackoff::builder().max_retries(5).build();
        let sleeper = RecordingSleeper::new();

        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = backoff
            .execute(&sleeper, || {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    let current = attempts.fetch_add(1, Ordering::SeqCst);
                    if current < 2 {
                        Err(std::io::Error::other("retry me"))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(sleeper.recorded().len(), 2);
    }

    #[tokio::test]
    async fn test_max_retries_exceeded_returns_last_error() {
        let backoff = ExponentialBackoff::builder().max_retries(2).build();
        let sleeper = RecordingSleeper::new();

        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = backoff
            .execute(&sleeper, || {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    let n = attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(std::io::Error::other(format!("failure {}", n)))
                }
            })
            .await;

        assert_eq!(result.unwrap_err().to_string(), "failure 2");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        // No sleep after the final attempt
        assert_eq!(sleeper.recorded().len(), 2);
    }

    #[tokio::test]
    async fn test_custom_retry_predicate() {
        struct NotFoundIsFatal {
            inner: ExponentialBackoff,
        }

        impl BackoffStrategy for NotFoundIsFatal {
            fn should_retry(&self, error: &(dyn Error + 'static), _attempt: u32) -> bool {
                error
                    .downcast_ref::<std::io::Error>()
                    .is_none_or(|e| e.kind() != std::io::ErrorKind::NotFound)
            }

            fn next_delay(&self, attempt: u32) -> Option<Duration> {
                self.inner.next_delay(attempt)
            }

            fn max_retries(&self) -> u32 {
                self.inner.max_retries()
            }
        }

        let backoff = NotFoundIsFatal {
            inner: ExponentialBackoff::builder().max_retries(5).build(),
        };

        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = backoff
            .execute(&NoopSleeper, || {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(std::io::Error::from(std::io::ErrorKind::NotFound))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    proptest! {
        #[test]
        fn prop_default_delay_bounds(attempt in 0u32..64) {
            let backoff = ExponentialBackoff::default();
            let delay = backoff.next_delay(attempt).unwrap();
            let base = 1000f64 * 2f64.powi(attempt as i32);
            let millis = delay.as_secs_f64() * 1000.0;

            prop_assert!(millis <= 10_000.0 + 1e-6);
            if base + 1000.0 <= 10_000.0 {
                prop_assert!(millis >= base - 1e-6);
                prop_assert!(millis <= base + 1000.0 + 1e-6);
            } else {
                prop_assert!(millis >= base.min(10_000.0) - 1e-6);
            }
        }
    }
}
