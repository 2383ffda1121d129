//! Anthropic Message Batches HTTP provider
//!
//! Sends requests to `{endpoint_base}{path}` with the `x-api-key`,
//! `anthropic-version` and `content-type` headers every batch endpoint
//! expects. The endpoint may be the public API or an edge proxy in front of
//! it.

use super::{HttpProvider, Method, RequestBuilder, Response};
use crate::{config::SubmissionConfig, error::Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::{sync::Arc, time::Duration};
use url::Url;

/// HTTP provider for the Message Batches API.
///
/// # Example
///
/// ```rust,no_run
/// use turbobatch::http::AnthropicHttpProvider;
///
/// let provider = AnthropicHttpProvider::builder()
///     .api_key("sk-ant-...")
///     .base_url("https://api.anthropic.com/v1")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct AnthropicHttpProvider {
    inner: Arc<ProviderInner>,
}

#[derive(Debug)]
struct ProviderInner {
    /// HTTP client for making requests
    http_client: reqwest::Client,
    /// Endpoint base, without trailing slash
    base_url: String,
    /// API key for authentication (x-api-key header)
    api_key: SecretString,
    /// API version header value
    api_version: String,
    /// Default timeout for requests
    timeout: Duration,
}

impl AnthropicHttpProvider {
    /// Create a new builder for configuring the provider.
    pub fn builder() -> AnthropicHttpProviderBuilder {
        AnthropicHttpProviderBuilder::default()
    }

    /// Build a provider from a submission config.
    pub fn from_config(config: &SubmissionConfig) -> Result<Self> {
        Self::builder()
            .base_url(config.endpoint_base())
            .api_key(config.api_key.expose_secret())
            .api_version(&config.api_version)
            .timeout(config.timeout)
            .build()
    }

    /// Create a request builder with provider configuration.
    fn build_request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let raw = format!("{}{}", self.inner.base_url, path);
        let url = Url::parse(&raw).map_err(|e| {
            crate::error::Error::InvalidUrl(format!("Failed to construct URL '{}': {}", raw, e))
        })?;

        RequestBuilder::new(self.inner.http_client.clone(), method, url, path)
            .timeout(self.inner.timeout)
            .try_header("anthropic-version", &self.inner.api_version)?
            .try_header("content-type", "application/json")?
            .try_header("x-api-key", self.inner.api_key.expose_secret())
    }
}

#[async_trait]
impl HttpProvider for AnthropicHttpProvider {
    async fn request(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Response> {
        let mut builder = self.build_request(method, path)?;

        if let Some(body) = body {
            builder = builder.body(body);
        }

        builder.send().await
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }

    fn base_url(&self) -> &str {
        &self.inner.base_url
    }
}

/// Builder for creating an `AnthropicHttpProvider` with custom configuration.
#[derive(Default)]
pub struct AnthropicHttpProviderBuilder {
    api_key: Option<SecretString>,
    base_url: Option<String>,
    api_version: Option<String>,
    timeout: Option<Duration>,
}

impl AnthropicHttpProviderBuilder {
    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key.into().into_boxed_str()));
        self
    }

    /// Set the endpoint base. Trailing slashes are removed.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the API version.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the provider.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No API key is provided
    /// - The base URL is invalid
    /// - HTTP client creation fails
    pub fn build(self) -> Result<AnthropicHttpProvider> {
        let api_key = self
            .api_key
            .ok_or_else(|| crate::error::Error::validation("api_key", "Please enter your API key"))?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| crate::DEFAULT_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        Url::parse(&base_url)
            .map_err(|e| crate::error::Error::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let timeout = self.timeout.unwrap_or(Duration::from_secs(600));

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("turbobatch-rust/{}", crate::VERSION))
            .build()
            .map_err(|e| crate::error::Error::HttpClient(e.to_string()))?;

        Ok(AnthropicHttpProvider {
            inner: Arc::new(ProviderInner {
                http_client,
                base_url,
                api_key,
                api_version: self
                    .api_version
                    .unwrap_or_else(|| crate::DEFAULT_API_VERSION.to_string()),
                timeout,
            }),
        })
    }
}
