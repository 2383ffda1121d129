//! Proxy error type and its `worker_error` response body

use std::error::Error as _;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Everything that turns a proxied call into a 500 `worker_error`.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The caller sent no `x-api-key`.
    #[error("Missing API key")]
    MissingApiKey,

    /// A batch path segment is not a `msgbatch_` identifier.
    #[error("Message Batch id must have `msgbatch_` prefix.")]
    InvalidBatchId(#[source] turbobatch::Error),

    /// The inbound request body could not be read.
    #[error("Failed to read request body")]
    Body(#[source] axum::extract::rejection::BytesRejection),

    /// The upstream call itself failed.
    #[error("Upstream request failed")]
    Upstream(#[source] reqwest::Error),

    /// A non-results response was not JSON.
    #[error("Failed to parse JSON response")]
    InvalidJson(#[source] serde_json::Error),

    /// A results response had no parseable line.
    #[error("Failed to parse JSONL response")]
    InvalidResults(#[source] turbobatch::Error),

    /// The upstream HTTP client could not be built.
    #[error("HTTP client error")]
    Client(#[source] reqwest::Error),

    /// Binding or serving the listener failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProxyError {
    /// The source chain, outermost first, joined with `": "`.
    pub fn details(&self) -> Option<String> {
        let mut causes = Vec::new();
        let mut source = self.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        (!causes.is_empty()).then(|| causes.join(": "))
    }

    /// The JSON body sent to the caller.
    pub fn body(&self) -> serde_json::Value {
        let mut error = json!({
            "type": "worker_error",
            "message": self.to_string(),
        });
        if let Some(details) = self.details() {
            error["details"] = json!(details);
        }
        json!({ "error": error })
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, details = ?self.details(), "Worker error");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                (header::CONTENT_TYPE, "application/json"),
            ],
            self.body().to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_body_without_source() {
        assert_eq!(
            ProxyError::MissingApiKey.body(),
            json!({"error": {"type": "worker_error", "message": "Missing API key"}})
        );
    }

    #[test]
    fn test_body_carries_source_chain() {
        let error = ProxyError::InvalidResults(turbobatch::Error::NoValidResults { lines: 2 });
        let body = error.body();

        assert_eq!(body["error"]["message"], "Failed to parse JSONL response");
        assert_eq!(
            body["error"]["details"],
            "No valid JSON lines found in results response (2 non-empty lines)"
        );
    }

    #[test]
    fn test_into_response_status_and_headers() {
        let response = ProxyError::MissingApiKey.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }
}
