//! Error types for the batch orchestrator
//!
//! Every failure belongs to one of four kinds (see [`ErrorKind`]): validation
//! problems caught before any network call, upstream rejections, transport
//! failures, and malformed identifiers or result payloads. The variants carry
//! structured fields so callers never need to match on message text.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for batch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for batch operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration or input failed validation before any request was sent.
    #[error("{message}")]
    Validation {
        /// Name of the offending field or input
        field: &'static str,
        /// Human-readable description
        message: String,
    },

    /// A submission is already outstanding for this session.
    #[error("A batch submission is already in progress")]
    SubmissionInFlight,

    /// The API returned a non-success status or an unreadable body.
    #[error("{message}")]
    Upstream {
        /// HTTP status of the response
        status: u16,
        /// Message extracted from the error body, or the raw body
        message: String,
    },

    /// Network or connection failure.
    #[error("Connection error: {0}")]
    Transport(String),

    /// Request timed out at the transport level.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// A batch identifier does not have the `msgbatch_` shape.
    #[error("Invalid batch ID format: {0:?}")]
    InvalidBatchId(String),

    /// No line of a results payload could be parsed.
    #[error("No valid JSON lines found in results response ({lines} non-empty lines)")]
    NoValidResults {
        /// Number of non-empty lines that were examined
        lines: usize,
    },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad configuration or input; report and halt.
    Validation,
    /// Non-success status or unparseable body from the API.
    Upstream,
    /// Network-level failure.
    Transport,
    /// Malformed batch id or result payload.
    Format,
    /// Local plumbing (I/O, serialization, client setup).
    Internal,
}

impl Error {
    /// Shorthand for a [`Error::Validation`].
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }

    /// Build an upstream error from a non-success response.
    ///
    /// The message is `error.message` from a JSON error body; `"HTTP {status}"`
    /// if the body is JSON without one; `"HTTP {status}: {body}"` otherwise.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => value
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(String::from)
                .unwrap_or_else(|| format!("HTTP {}", status)),
            Err(_) => format!("HTTP {}: {}", status, body),
        };

        Error::Upstream { status, message }
    }

    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } | Error::SubmissionInFlight => ErrorKind::Validation,
            Error::Upstream { .. } => ErrorKind::Upstream,
            Error::Transport(_) | Error::Timeout(_) => ErrorKind::Transport,
            Error::InvalidBatchId(_) | Error::NoValidResults { .. } => ErrorKind::Format,
            Error::InvalidUrl(_)
            | Error::HttpClient(_)
            | Error::Serialization(_)
            | Error::Csv(_)
            | Error::Io(_) => ErrorKind::Internal,
        }
    }

    /// Check if this error is worth another status poll.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Upstream | ErrorKind::Transport)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}
