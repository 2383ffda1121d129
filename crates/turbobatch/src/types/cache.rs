//! Prompt caching types

use serde::{Deserialize, Serialize};

/// Cache control configuration for prompt caching.
///
/// See [Prompt Caching documentation](https://docs.anthropic.com/en/docs/build-with-claude/prompt-caching).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CacheControl {
    /// Ephemeral cache breakpoint
    Ephemeral,
}

/// System prompt block.
///
/// Every system prompt sent in a batch is a single text block carrying an
/// ephemeral cache breakpoint, so the shared prompt is cached across the
/// requests of the batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum SystemPromptBlock {
    /// Text block with optional cache control
    #[serde(rename = "text")]
    Text {
        /// The text content
        text: String,
        /// Cache control configuration
        #[serde(skip_serializing_if = "Option::is_none")]
        cache_control: Option<CacheControl>,
    },
}

impl SystemPromptBlock {
    /// Create a text block without caching.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            text: content.into(),
            cache_control: None,
        }
    }

    /// Create a text block marked for prompt caching.
    pub fn text_cached(content: impl Into<String>) -> Self {
        Self::Text {
            text: content.into(),
            cache_control: Some(CacheControl::Ephemeral),
        }
    }

    /// The block's text.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text, .. } => text,
        }
    }
}
