//! Batch processing types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Prefix every Message Batch identifier carries.
pub const BATCH_ID_PREFIX: &str = "msgbatch_";

/// Validated Message Batch identifier.
///
/// Only constructible through [`BatchId::parse`], so holding one means the id
/// starts with `msgbatch_` followed by a non-empty run of ASCII
/// alphanumerics, `_` or `-`. Safe to splice into a URL path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    /// Validate and wrap a batch identifier.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self> {
        let raw = raw.as_ref();
        let suffix = raw
            .strip_prefix(BATCH_ID_PREFIX)
            .ok_or_else(|| Error::InvalidBatchId(raw.to_string()))?;

        let well_formed = !suffix.is_empty()
            && suffix
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');

        if !well_formed {
            return Err(Error::InvalidBatchId(raw.to_string()));
        }

        Ok(Self(raw.to_string()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BatchId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for BatchId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Processing status of a batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    /// Batch is being processed
    InProgress,
    /// Cancellation requested; still draining
    Canceling,
    /// Batch processing ended
    Ended,
    /// Batch failed as a whole
    Errored,
    /// Batch was canceled
    Canceled,
    /// Batch expired before completion
    Expired,
    /// Any status this client does not recognize
    #[serde(other)]
    Unknown,
}

impl ProcessingStatus {
    /// Whether polling should stop at this status.
    ///
    /// Unrecognized statuses are terminal so a new upstream state can never
    /// keep the scheduler polling until its cap.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress | Self::Canceling)
    }

    /// The wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Canceling => "canceling",
            Self::Ended => "ended",
            Self::Errored => "errored",
            Self::Canceled => "canceled",
            Self::Expired => "expired",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request count statistics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RequestCounts {
    /// Number of processing requests
    pub processing: u32,
    /// Number of succeeded requests
    pub succeeded: u32,
    /// Number of errored requests
    pub errored: u32,
    /// Number of canceled requests
    pub canceled: u32,
    /// Number of expired requests
    pub expired: u32,
}

impl RequestCounts {
    /// Sum of all buckets, saturating at `u32::MAX`.
    pub fn total(&self) -> u32 {
        [self.succeeded, self.errored, self.canceled, self.expired]
            .into_iter()
            .fold(self.processing, u32::saturating_add)
    }
}

/// Snapshot of a batch as reported by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchHandle {
    /// Batch identifier
    #[serde(rename = "id")]
    pub batch_id: BatchId,

    /// Processing status
    #[serde(rename = "processing_status")]
    pub status: ProcessingStatus,

    /// Request counts
    #[serde(rename = "request_counts")]
    pub counts: RequestCounts,

    /// When the batch was created
    pub created_at: Option<DateTime<Utc>>,

    /// When the batch expires
    pub expires_at: Option<DateTime<Utc>>,

    /// When processing ended
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    /// Results URL once the batch has ended
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_url: Option<String>,
}

/// Batch object as it appears on the wire, before id validation.
#[derive(Debug, Deserialize)]
struct RawBatch {
    id: String,
    processing_status: ProcessingStatus,
    #[serde(default)]
    request_counts: RequestCounts,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    results_url: Option<String>,
}

impl BatchHandle {
    /// Parse a batch object returned by the API.
    ///
    /// A body that is not a batch object is an [`Error::Upstream`]; a batch
    /// whose id lacks the `msgbatch_` shape is an [`Error::InvalidBatchId`].
    pub fn from_api_body(status: u16, body: &str) -> Result<Self> {
        let raw: RawBatch = serde_json::from_str(body).map_err(|e| Error::Upstream {
            status,
            message: format!("Invalid JSON response: {}", e),
        })?;

        Ok(Self {
            batch_id: BatchId::parse(&raw.id)?,
            status: raw.processing_status,
            counts: raw.request_counts,
            created_at: raw.created_at,
            expires_at: raw.expires_at,
            ended_at: raw.ended_at,
            results_url: raw.results_url,
        })
    }

    /// Total number of requests in the batch.
    pub fn total(&self) -> u32 {
        self.counts.total()
    }

    /// Fraction of requests that succeeded, in `[0, 1]`.
    ///
    /// Zero when the batch reports no requests at all.
    pub fn progress(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => f64::from(self.counts.succeeded) / f64::from(total),
        }
    }

    /// Whether the batch has reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
