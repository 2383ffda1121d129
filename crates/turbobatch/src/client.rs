//! Message Batches client

use std::sync::Arc;

use http::Method;
use tracing::{debug, info};

use crate::config::SubmissionConfig;
use crate::error::{Error, Result};
use crate::http::{AnthropicHttpProvider, HttpProvider};
use crate::results::parse_result_records;
use crate::types::request::BatchCreateBody;
use crate::types::{BatchHandle, BatchId, BatchRequest, ResultRecord};

const BATCHES_PATH: &str = "/messages/batches";

/// Client for the four batch endpoints: create, retrieve, cancel, results.
///
/// Each method makes exactly one HTTP call. Retrying is left to the poll
/// loop; nothing here resubmits.
///
/// ```rust,no_run
/// # use turbobatch::{BatchClient, SubmissionConfig};
/// # async fn example(config: SubmissionConfig) -> turbobatch::Result<()> {
/// let client = BatchClient::new(&config)?;
/// let batch_id = turbobatch::BatchId::parse("msgbatch_013Zva2CMHLNnXjNJJKqJ2EF")?;
/// let handle = client.retrieve(&batch_id).await?;
/// println!("{} {:.0}%", handle.status, handle.progress() * 100.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BatchClient {
    provider: Arc<dyn HttpProvider>,
}

impl BatchClient {
    /// Create a client for the endpoint and credentials in `config`.
    pub fn new(config: &SubmissionConfig) -> Result<Self> {
        Ok(Self::with_provider(Arc::new(AnthropicHttpProvider::from_config(config)?)))
    }

    /// Create a client over any provider.
    pub fn with_provider(provider: Arc<dyn HttpProvider>) -> Self {
        Self { provider }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &Arc<dyn HttpProvider> {
        &self.provider
    }

    /// Check that the endpoint answers a CORS preflight.
    ///
    /// Sends `OPTIONS` to the endpoint base itself. Any 2xx counts as
    /// reachable; other statuses become [`Error::Upstream`] with the message
    /// `HTTP {status}`.
    #[tracing::instrument(skip_all, fields(endpoint = %self.provider.base_url()))]
    pub async fn check_endpoint(&self) -> Result<()> {
        let response = self.provider.request(Method::OPTIONS, "", None).await?;

        if !response.is_success() {
            let status = response.status().as_u16();
            return Err(Error::Upstream {
                status,
                message: format!("HTTP {}", status),
            });
        }

        info!("Endpoint connection successful");
        Ok(())
    }

    /// Submit a batch.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for an empty request list, before any call
    /// - [`Error::Upstream`] for an error status or a body that is not a batch
    /// - [`Error::InvalidBatchId`] if the returned id is malformed
    #[tracing::instrument(skip(self, requests), fields(request_count = requests.len()))]
    pub async fn submit(&self, requests: &[BatchRequest]) -> Result<BatchHandle> {
        if requests.is_empty() {
            return Err(Error::validation("requests", "No requests to submit"));
        }

        let body = serde_json::to_vec(&BatchCreateBody { requests })?;
        let response = self
            .provider
            .request(Method::POST, BATCHES_PATH, Some(body))
            .await?
            .error_for_status()?;

        let handle = BatchHandle::from_api_body(response.status().as_u16(), &response.text())?;
        info!(
            batch_id = %handle.batch_id,
            status = %handle.status,
            total = handle.total(),
            "Batch submitted"
        );

        Ok(handle)
    }

    /// Fetch the current state of a batch.
    #[tracing::instrument(skip_all, fields(batch_id = %batch_id))]
    pub async fn retrieve(&self, batch_id: &BatchId) -> Result<BatchHandle> {
        let path = format!("{}/{}", BATCHES_PATH, batch_id);
        let response = self
            .provider
            .request(Method::GET, &path, None)
            .await?
            .error_for_status()?;

        let handle = BatchHandle::from_api_body(response.status().as_u16(), &response.text())?;
        debug!(status = %handle.status, progress = handle.progress(), "Batch retrieved");
        Ok(handle)
    }

    /// Request cancellation of a batch.
    ///
    /// The batch usually reports `canceling` until in-flight requests drain.
    #[tracing::instrument(skip_all, fields(batch_id = %batch_id))]
    pub async fn cancel(&self, batch_id: &BatchId) -> Result<BatchHandle> {
        let path = format!("{}/{}/cancel", BATCHES_PATH, batch_id);
        let response = self
            .provider
            .request(Method::POST, &path, None)
            .await?
            .error_for_status()?;

        let handle = BatchHandle::from_api_body(response.status().as_u16(), &response.text())?;
        info!(status = %handle.status, "Batch cancellation requested");
        Ok(handle)
    }

    /// Download and parse the results of an ended batch.
    ///
    /// Accepts the API's line-delimited body and the JSON array an edge proxy
    /// returns.
    #[tracing::instrument(skip_all, fields(batch_id = %batch_id))]
    pub async fn results(&self, batch_id: &BatchId) -> Result<Vec<ResultRecord>> {
        let path = format!("{}/{}/results", BATCHES_PATH, batch_id);
        let response = self
            .provider
            .request(Method::GET, &path, None)
            .await?
            .error_for_status()?;

        let records = parse_result_records(&response.text())?;
        info!(count = records.len(), "Batch results retrieved");
        Ok(records)
    }
}
