//! Role-tagged chat messages sent to the completion endpoint.

use serde::{Deserialize, Serialize};

/// Chat message in the provider's wire shape.
///
/// `reasoning_details` carries a previous assistant turn's reasoning trace back
/// to the provider so it can continue the chain; it is omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_details: Option<serde_json::Value>,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageRole::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text)
    }

    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            content: text.into(),
            reasoning_details: None,
        }
    }

    pub fn with_reasoning(mut self, reasoning: Option<serde_json::Value>) -> Self {
        self.reasoning_details = reasoning;
        self
    }

    pub fn is_system(&self) -> bool {
        self.role == MessageRole::System
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_without_reasoning() {
        let v = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(v, json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn test_serializes_reasoning_when_present() {
        let m = Message::assistant("ok").with_reasoning(Some(json!([{"type": "reasoning.text"}])));
        let v = serde_json::to_value(m).unwrap();
        assert_eq!(v["role"], "assistant");
        assert_eq!(v["reasoning_details"][0]["type"], "reasoning.text");
    }
}
