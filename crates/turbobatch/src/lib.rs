//! # turbobatch
//!
//! Batch lifecycle orchestration for Anthropic's Message Batches API:
//! - Request construction with generated ids and a cached system prompt
//! - Submission, status, cancellation and result download
//! - Status polling with capped exponential backoff on an injectable clock
//! - Tolerant parsing of the line-delimited result stream
//! - CSV export of results
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use turbobatch::{BatchRunner, InputRecord, LoggingObserver, SubmissionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SubmissionConfig::builder()
//!         .api_key("your-api-key")
//!         .model("claude-3-5-haiku-20241022")
//!         .max_tokens(512u32)
//!         .system_prompt("Answer in one sentence.")
//!         .build()?;
//!
//!     let records = vec![
//!         InputRecord::new("capital-fr", "What is the capital of France?"),
//!         InputRecord::anonymous("What is the capital of Peru?"),
//!     ];
//!
//!     let outcome = BatchRunner::new(&config)?
//!         .run(&config, &records, &LoggingObserver)
//!         .await?;
//!
//!     for record in outcome.results().unwrap_or_default() {
//!         println!("{}: {}", record.custom_id, record.text().unwrap_or("-"));
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use builder::{build_requests, generate_custom_id, validate_records};
pub use client::BatchClient;
pub use config::{PollConfig, SubmissionConfig, SubmissionConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use observer::{BatchObserver, LoggingObserver, NoopObserver};
pub use poll::{PollFinish, PollRetryPolicy, PollScheduler, PollState, poll_batch_status};
pub use results::{parse_jsonl, parse_result_records};
pub use runner::{BatchOutcome, BatchRunner};
pub use session::{SessionState, SubmissionGuard};
pub use types::*;

// Module declarations
pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod http;
pub mod loader;
pub mod observability;
pub mod observer;
pub mod poll;
pub mod results;
pub mod runner;
pub mod session;
pub mod types;

// Clock abstractions used by the poll loop
pub use turbobatch_core::clock::{NoopSleeper, RecordingSleeper, Sleeper, TokioSleeper};

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use turbobatch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BatchClient, BatchObserver, BatchOutcome, BatchRunner, Error, Result, SubmissionConfig,
        types::{BatchHandle, BatchId, BatchRequest, InputRecord, Outcome, ProcessingStatus, ResultRecord},
    };
}

/// Crate version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default endpoint base: the public API's v1 root
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Default API version header value
pub const DEFAULT_API_VERSION: &str = "2023-06-01";


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_BASE_URL, "https://api.anthropic.com/v1");
        assert_eq!(DEFAULT_API_VERSION, "2023-06-01");
    }
}
