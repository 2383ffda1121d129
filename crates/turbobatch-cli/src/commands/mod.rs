//! Command implementations

pub mod cancel;
pub mod check;
pub mod proxy;
pub mod results;
pub mod run;
pub mod status;

use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use turbobatch::http::AnthropicHttpProvider;
use turbobatch::{BatchClient, BatchHandle, BatchId, SubmissionConfig};

/// Connection and request settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// API root
    #[arg(long, env = "TURBOBATCH_ENDPOINT", default_value = turbobatch::DEFAULT_BASE_URL, global = true)]
    pub endpoint: String,

    /// API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Model for every request in the batch
    #[arg(long, env = "TURBOBATCH_MODEL", global = true)]
    pub model: Option<String>,

    /// Maximum output tokens per request (1-4096)
    #[arg(long, env = "TURBOBATCH_MAX_TOKENS", default_value_t = 1024, global = true)]
    pub max_tokens: u32,

    /// System prompt sent, cached, with every request
    #[arg(long, env = "TURBOBATCH_SYSTEM_PROMPT", global = true)]
    pub system_prompt: Option<String>,
}

impl GlobalArgs {
    fn api_key(&self) -> anyhow::Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .context("Please enter your API key (--api-key or ANTHROPIC_API_KEY)")
    }

    /// Full submission settings; `model` and `api_key` are required here.
    pub fn submission_config(&self) -> anyhow::Result<SubmissionConfig> {
        let mut builder = SubmissionConfig::builder();
        builder
            .endpoint(self.endpoint.as_str())
            .api_key(self.api_key()?)
            .model(self.model.clone().context("Please select a model (--model or TURBOBATCH_MODEL)")?)
            .max_tokens(self.max_tokens);
        if let Some(prompt) = &self.system_prompt {
            builder.system_prompt(prompt.as_str());
        }

        let config = builder.build()?;
        config.validate()?;
        Ok(config)
    }

    /// A client for commands that only address an existing batch.
    pub fn client(&self) -> anyhow::Result<BatchClient> {
        self.client_with_key(self.api_key()?)
    }

    /// A client for the connectivity check, which works without a key.
    pub fn check_client(&self) -> anyhow::Result<BatchClient> {
        if self.endpoint.trim().is_empty() {
            anyhow::bail!("Please enter the endpoint");
        }
        self.client_with_key(self.api_key.as_deref().unwrap_or_default())
    }

    fn client_with_key(&self, api_key: &str) -> anyhow::Result<BatchClient> {
        let provider = AnthropicHttpProvider::builder()
            .base_url(self.endpoint.as_str())
            .api_key(api_key)
            .build()?;
        Ok(BatchClient::with_provider(Arc::new(provider)))
    }
}

/// Parse a batch id argument.
pub fn parse_batch_id(raw: &str) -> anyhow::Result<BatchId> {
    BatchId::parse(raw.trim()).with_context(|| format!("'{}' is not a Message Batch id", raw))
}

/// Print a one-block summary of a batch snapshot.
pub fn print_handle(handle: &BatchHandle) {
    let status = handle.status.to_string();
    let status = if handle.is_terminal() {
        status.green()
    } else {
        status.yellow()
    };

    println!("{} {}", "Batch".bold(), handle.batch_id.to_string().cyan());
    println!("  Status:     {}", status);
    println!(
        "  Progress:   {:.0}% ({} of {} done)",
        handle.progress() * 100.0,
        handle.total().saturating_sub(handle.counts.processing),
        handle.total()
    );
    println!(
        "  Succeeded:  {}  Errored: {}  Canceled: {}  Expired: {}",
        handle.counts.succeeded, handle.counts.errored, handle.counts.canceled, handle.counts.expired
    );
    if let Some(created) = handle.created_at {
        println!("  Created:    {}", created);
    }
    if let Some(ended) = handle.ended_at {
        println!("  Ended:      {}", ended);
    }
}
