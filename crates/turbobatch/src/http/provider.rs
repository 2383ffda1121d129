//! HTTP provider trait
//!
//! The batch client talks to the network only through [`HttpProvider`], so it
//! works the same against the public API, an edge proxy, or a test double.

use crate::{
    error::Result,
    http::{Method, Response},
};
use async_trait::async_trait;
use std::fmt;

/// Provider trait for sending requests to a batch endpoint.
#[async_trait]
pub trait HttpProvider: Send + Sync + fmt::Debug {
    /// Make a request and return the buffered response.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method (GET, POST)
    /// * `path` - Path below the endpoint base (e.g., "/messages/batches")
    /// * `body` - Optional JSON request body
    ///
    /// # Errors
    ///
    /// Returns an error only if no response was received. Error statuses
    /// are returned as a [`Response`].
    async fn request(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Response>;

    /// Get the provider name for debugging/logging.
    fn provider_name(&self) -> &'static str;

    /// Get the base URL for this provider (for debugging).
    fn base_url(&self) -> &str;
}
