#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core abstractions for the turbobatch crates.
//!
//! - **Retry strategies** via the [`BackoffStrategy`](retry::BackoffStrategy) trait,
//!   with [`ExponentialBackoff`](retry::ExponentialBackoff) implementing capped
//!   exponential growth plus additive jitter
//! - **Injectable clocks** via the [`Sleeper`](clock::Sleeper) trait, so that
//!   polling and backoff logic can be driven without wall-clock delays in tests
//!
//! # Examples
//!
//! ```rust
//! use turbobatch_core::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backoff = ExponentialBackoff::builder()
//!     .max_retries(2)
//!     .initial_delay(Duration::from_secs(1))
//!     .build();
//!
//! let result = backoff
//!     .execute(&TokioSleeper, || async { Ok::<_, std::io::Error>(42) })
//!     .await?;
//! assert_eq!(result, 42);
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod retry;

/// Convenient re-exports of commonly used items.
pub mod prelude {
    pub use crate::clock::{NoopSleeper, RecordingSleeper, Sleeper, TokioSleeper};
    pub use crate::retry::{BackoffStrategy, ExponentialBackoff, ExponentialBackoffBuilder};
}
