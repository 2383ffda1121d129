//! Batch result types

use serde::{Deserialize, Serialize};

/// Result of one request in an ended batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Custom ID from the request
    pub custom_id: String,

    /// What happened to the request
    pub outcome: Outcome,
}

/// Outcome of a single batch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Outcome {
    /// The model produced a message
    Succeeded {
        /// Text of the first content block
        text: String,
    },

    /// The request failed
    Errored {
        /// Error message reported for the request
        message: String,
    },

    /// Any other result type, such as `canceled` or `expired`
    Other {
        /// The upstream result type
        kind: String,
    },
}

impl ResultRecord {
    /// Result type as reported upstream (`succeeded`, `errored`, ...).
    pub fn status(&self) -> &str {
        match &self.outcome {
            Outcome::Succeeded { .. } => "succeeded",
            Outcome::Errored { .. } => "errored",
            Outcome::Other { kind } => kind,
        }
    }

    /// Message text for succeeded requests.
    pub fn text(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Succeeded { text } => Some(text),
            _ => None,
        }
    }

    /// Error message for errored requests.
    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Errored { message } => Some(message),
            _ => None,
        }
    }

    /// Whether the request succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Succeeded { .. })
    }
}
