//! Retry strategies and backoff implementations.
//!
//! # Key Types
//!
//! - [`BackoffStrategy`] - Core trait for retry strategies
//! - [`ExponentialBackoff`] - Capped exponential backoff with additive jitter
//!
//! # Examples
//!
//! ```rust
//! use turbobatch_core::clock::NoopSleeper;
//! use turbobatch_core::retry::{BackoffStrategy, ExponentialBackoff};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backoff = ExponentialBackoff::default();
//!
//! let result = backoff
//!     .execute(&NoopSleeper, || async { Ok::<_, std::io::Error>("done") })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod exponential;
mod strategy;

pub use exponential::{ExponentialBackoff, ExponentialBackoffBuilder};
pub use strategy::BackoffStrategy;
