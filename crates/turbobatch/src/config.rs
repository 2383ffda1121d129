//! Configuration for batch submission and polling

use derive_builder::Builder;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::error::{Error, Result};

/// Largest `max_tokens` accepted for a batch request.
pub const MAX_TOKENS_LIMIT: u32 = 4096;

/// Everything needed to build and submit one batch.
///
/// Validated once, before any request is built or sent.
///
/// ```rust
/// # use turbobatch::SubmissionConfig;
/// let config = SubmissionConfig::builder()
///     .endpoint("https://api.anthropic.com/v1/")
///     .api_key("sk-ant-test")
///     .model("claude-3-5-haiku-20241022")
///     .max_tokens(1024u32)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.endpoint_base(), "https://api.anthropic.com/v1");
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(error = "crate::Error"))]
pub struct SubmissionConfig {
    /// Base URL the batch endpoints hang off, either the API or an edge proxy
    #[builder(default = "crate::DEFAULT_BASE_URL.to_string()")]
    pub endpoint: String,

    /// API key, forwarded as `x-api-key`
    #[builder(setter(custom))]
    pub api_key: SecretString,

    /// Model to use for every request in the batch
    pub model: String,

    /// Maximum tokens per request
    #[builder(default = "1024")]
    pub max_tokens: u32,

    /// Shared system prompt, cached across the batch
    #[builder(default, setter(strip_option, into))]
    pub system_prompt: Option<String>,

    /// `anthropic-version` header value
    #[builder(default = "crate::DEFAULT_API_VERSION.to_string()")]
    pub api_version: String,

    /// Per-request transport timeout
    #[builder(default = "Duration::from_secs(600)")]
    pub timeout: Duration,
}

impl SubmissionConfigBuilder {
    /// Set the API key.
    pub fn api_key(&mut self, api_key: impl Into<String>) -> &mut Self {
        self.api_key = Some(SecretString::new(api_key.into().into_boxed_str()));
        self
    }
}

impl From<derive_builder::UninitializedFieldError> for Error {
    fn from(e: derive_builder::UninitializedFieldError) -> Self {
        match e.field_name() {
            "api_key" => Error::validation("api_key", "Please enter your API key"),
            "model" => Error::validation("model", "Please select a model"),
            field => Error::validation(field, format!("Missing required field: {}", field)),
        }
    }
}

impl SubmissionConfig {
    /// Create a builder for constructing a SubmissionConfig.
    pub fn builder() -> SubmissionConfigBuilder {
        SubmissionConfigBuilder::default()
    }

    /// Endpoint with surrounding whitespace and trailing slashes removed.
    pub fn endpoint_base(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }

    /// The trimmed system prompt, if it has any content.
    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt
            .as_deref()
            .map(str::trim)
            .filter(|prompt| !prompt.is_empty())
    }

    /// Check the configuration before anything touches the network.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint_base().is_empty() {
            return Err(Error::validation("endpoint", "Please enter the endpoint"));
        }
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(Error::validation("api_key", "Please enter your API key"));
        }
        if self.model.trim().is_empty() {
            return Err(Error::validation("model", "Please select a model"));
        }
        if !(1..=MAX_TOKENS_LIMIT).contains(&self.max_tokens) {
            return Err(Error::validation(
                "max_tokens",
                format!("Max tokens must be between 1 and {}", MAX_TOKENS_LIMIT),
            ));
        }
        if self.api_version.trim().is_empty() {
            return Err(Error::validation("api_version", "API version must not be empty"));
        }
        Ok(())
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `TURBOBATCH_ENDPOINT` for the endpoint base (defaults to the public API)
    /// - `ANTHROPIC_API_KEY` for authentication
    /// - `TURBOBATCH_MODEL` for the model
    /// - `TURBOBATCH_MAX_TOKENS` for the per-request token limit
    /// - `TURBOBATCH_SYSTEM_PROMPT` for the shared system prompt
    ///
    /// A `.env` file in the working directory is loaded first when present.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        use std::env;

        let _ = dotenvy::dotenv();

        let mut builder = Self::builder();

        if let Ok(endpoint) = env::var("TURBOBATCH_ENDPOINT") {
            builder.endpoint(endpoint);
        }
        if let Ok(api_key) = env::var("ANTHROPIC_API_KEY") {
            builder.api_key(api_key);
        }
        if let Ok(model) = env::var("TURBOBATCH_MODEL") {
            builder.model(model);
        }
        if let Ok(max_tokens) = env::var("TURBOBATCH_MAX_TOKENS") {
            let max_tokens = max_tokens.trim().parse::<u32>().map_err(|_| {
                Error::validation(
                    "max_tokens",
                    format!("Max tokens must be between 1 and {}", MAX_TOKENS_LIMIT),
                )
            })?;
            builder.max_tokens(max_tokens);
        }
        if let Ok(prompt) = env::var("TURBOBATCH_SYSTEM_PROMPT") {
            builder.system_prompt(prompt);
        }

        builder.build()
    }
}

/// Timing of the outer polling schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay before each status poll
    pub interval: Duration,

    /// Maximum number of polls before giving up on a terminal status
    pub max_polls: u32,

    /// Delay between observing `ended` and the first results call
    pub results_delay: Duration,

    /// Total attempts per status poll, including the first
    pub retry_count: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_polls: 60,
            results_delay: Duration::from_secs(2),
            retry_count: 3,
        }
    }
}
