//! Batch request types

use serde::{Deserialize, Serialize};

use super::SystemPromptBlock;

/// One entry of a batch submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Identifier unique within the batch; echoed back in results
    pub custom_id: String,

    /// The message request parameters
    pub params: MessageParams,
}

/// Parameters of a single Messages API call inside a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageParams {
    /// Model to use
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// System prompt blocks, omitted entirely when there is no prompt
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub system: Option<Vec<SystemPromptBlock>>,

    /// Conversation messages
    pub messages: Vec<MessageParam>,
}

/// A conversation message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageParam {
    /// Role of the message
    pub role: Role,

    /// Plain-text content
    pub content: String,
}

impl MessageParam {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Role of a message sender.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message
    User,
    /// Assistant message
    Assistant,
}

/// Body of a batch creation call.
#[derive(Debug, Serialize)]
pub(crate) struct BatchCreateBody<'a> {
    pub(crate) requests: &'a [BatchRequest],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_request_serialization_without_system() {
        let request = BatchRequest {
            custom_id: "req-001".to_string(),
            params: MessageParams {
                model: "claude-3-5-haiku-20241022".to_string(),
                max_tokens: 512,
                system: None,
                messages: vec![MessageParam::user("Hello")],
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["custom_id"], "req-001");
        assert_eq!(json["params"]["max_tokens"], 512);
        assert_eq!(json["params"]["messages"][0]["role"], "user");
        assert_eq!(json["params"]["messages"][0]["content"], "Hello");
        assert!(json["params"].get("system").is_none());
    }

    #[test]
    fn test_batch_request_serialization_with_system() {
        let request = BatchRequest {
            custom_id: "req-002".to_string(),
            params: MessageParams {
                model: "claude-3-5-haiku-20241022".to_string(),
                max_tokens: 64,
                system: Some(vec![SystemPromptBlock::text_cached("Answer in French.")]),
                messages: vec![MessageParam::user("Hello")],
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["params"]["system"][0]["text"], "Answer in French.");
        assert_eq!(json["params"]["system"][0]["cache_control"]["type"], "ephemeral");
    }
}
