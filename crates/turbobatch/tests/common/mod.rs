//! Common test utilities and fixtures
//!
//! - rstest for parameterized cases
//! - wiremock for HTTP mocking (isolated, parallel-safe)
//! - #[tokio::test] for async testing

#![allow(dead_code)]

pub mod responses;

pub use responses::{
    // Batch responses
    batch_canceling_response,
    batch_completed_response,
    batch_create_response,
    batch_in_progress_response,
    batch_results_jsonl,
    // Error responses
    error_invalid_request,
    error_overloaded,
};

use turbobatch::{BatchClient, SubmissionConfig};
use wiremock::MockServer;

/// Batch id used by every fixture.
pub const BATCH_ID: &str = "msgbatch_01234567890";

/// Submission config pointed at a mock server, with a `/v1` endpoint base.
pub fn config_for(server: &MockServer) -> SubmissionConfig {
    SubmissionConfig::builder()
        .endpoint(format!("{}/v1/", server.uri()))
        .api_key("test-key")
        .model("claude-3-5-haiku-20241022")
        .max_tokens(256u32)
        .build()
        .unwrap()
}

/// Batch client pointed at a mock server.
pub fn client_for(server: &MockServer) -> BatchClient {
    BatchClient::new(&config_for(server)).unwrap()
}
