//! Input records

use serde::{Deserialize, Serialize};

/// One unit of work read from an external source.
///
/// `id` becomes the request's `custom_id` when present and non-blank;
/// otherwise an id is generated at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Caller-supplied identifier
    #[serde(rename = "custom_id", default)]
    pub id: Option<String>,

    /// User message sent to the model
    #[serde(rename = "user_message")]
    pub message: String,
}

impl InputRecord {
    /// Record with a caller-supplied id.
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            message: message.into(),
        }
    }

    /// Record without an id.
    pub fn anonymous(message: impl Into<String>) -> Self {
        Self {
            id: None,
            message: message.into(),
        }
    }

    /// The supplied id, ignoring blank strings.
    pub fn supplied_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// Build a record from a JSON object, stringifying numeric ids.
    ///
    /// Returns `None` when `user_message` is missing or not a string.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let message = value.get("user_message")?.as_str()?.to_string();
        let id = match value.get("custom_id") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Some(Self { id, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_supplied_id_ignores_blank() {
        assert_eq!(InputRecord::new("row-1", "hi").supplied_id(), Some("row-1"));
        assert_eq!(InputRecord::new("   ", "hi").supplied_id(), None);
        assert_eq!(InputRecord::anonymous("hi").supplied_id(), None);
    }

    #[test]
    fn test_from_json_stringifies_numbers() {
        let record = InputRecord::from_json(&json!({"custom_id": 42, "user_message": "hi"})).unwrap();
        assert_eq!(record.id.as_deref(), Some("42"));
        assert_eq!(record.message, "hi");
    }

    #[test]
    fn test_from_json_requires_message() {
        assert!(InputRecord::from_json(&json!({"custom_id": "a"})).is_none());
        assert!(InputRecord::from_json(&json!({"user_message": 5})).is_none());
    }
}
