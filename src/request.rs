//! Request composition: system prompt + history + new input, and the fixed
//! generation parameters sent with every attempt.

use crate::error::{Error, ErrorContext};
use crate::types::{Message, MessageRole};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Generation parameters shared by every candidate attempt of one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    /// Ask the provider for a reasoning trace alongside the content.
    pub reasoning: bool,
}

impl GenerationConfig {
    /// Parameters used for structured triage output.
    pub fn triage() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 500,
            top_p: 0.9,
            reasoning: true,
        }
    }

    /// Parameters used by the chat widget; shorter replies than triage.
    pub fn chat() -> Self {
        Self {
            max_tokens: 400,
            ..Self::triage()
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::triage()
    }
}

/// New input for [`compose`]: either plain text or ready-made messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ComposeInput {
    Text(String),
    Messages(Vec<Message>),
}

impl From<&str> for ComposeInput {
    fn from(s: &str) -> Self {
        ComposeInput::Text(s.to_string())
    }
}

impl From<String> for ComposeInput {
    fn from(s: String) -> Self {
        ComposeInput::Text(s)
    }
}

impl From<Vec<Message>> for ComposeInput {
    fn from(messages: Vec<Message>) -> Self {
        ComposeInput::Messages(messages)
    }
}

/// Assemble the ordered message list for one completion.
///
/// A system message is prepended only when `system_prompt` is given and no
/// message already carries the `system` role.
pub fn compose(
    input: impl Into<ComposeInput>,
    system_prompt: Option<&str>,
    history: &[Message],
) -> Vec<Message> {
    let mut messages: Vec<Message> = history.to_vec();
    match input.into() {
        ComposeInput::Text(text) => messages.push(Message::user(text)),
        ComposeInput::Messages(more) => messages.extend(more),
    }

    if let Some(prompt) = system_prompt {
        if !messages.iter().any(Message::is_system) {
            messages.insert(0, Message::system(prompt));
        }
    }
    messages
}

/// Messages plus generation parameters, checked for the system-message invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    messages: Vec<Message>,
    generation: GenerationConfig,
}

impl CompletionRequest {
    /// Build a request; at most one `system` message is allowed and only at index 0.
    pub fn new(messages: Vec<Message>, generation: GenerationConfig) -> Result<Self> {
        if messages.is_empty() {
            return Err(Error::invalid_request_with_context(
                "completion request has no messages",
                ErrorContext::new()
                    .with_field_path("messages")
                    .with_source("completion_request"),
            ));
        }

        for (idx, message) in messages.iter().enumerate() {
            if message.role == MessageRole::System && idx != 0 {
                return Err(Error::invalid_request_with_context(
                    "system message must be the first and only system message",
                    ErrorContext::new()
                        .with_field_path(format!("messages[{}].role", idx))
                        .with_source("completion_request"),
                ));
            }
        }

        Ok(Self {
            messages,
            generation,
        })
    }

    /// Compose and validate in one step.
    pub fn compose(
        input: impl Into<ComposeInput>,
        system_prompt: Option<&str>,
        history: &[Message],
        generation: GenerationConfig,
    ) -> Result<Self> {
        Self::new(compose(input, system_prompt, history), generation)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn generation(&self) -> &GenerationConfig {
        &self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_appended_after_history() {
        let history = vec![Message::user("hello"), Message::assistant("hi there")];
        let out = compose("my head hurts", None, &history);

        assert_eq!(out.len(), 3);
        assert_eq!(out[2], Message::user("my head hurts"));
        assert_eq!(out[0], Message::user("hello"));
    }

    #[test]
    fn test_system_prompt_prepended_once() {
        let out = compose("cough", Some("be brief"), &[]);
        assert_eq!(out, vec![Message::system("be brief"), Message::user("cough")]);
    }

    #[test]
    fn test_existing_system_message_kept() {
        let history = vec![Message::system("original"), Message::user("q1")];
        let out = compose("q2", Some("replacement"), &history);

        let systems: Vec<_> = out.iter().filter(|m| m.is_system()).collect();
        assert_eq!(systems.len(), 1);
        assert_eq!(systems[0].content, "original");
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_message_input_with_system_is_not_duplicated() {
        let input = vec![Message::system("from input"), Message::user("q")];
        let out = compose(input, Some("other"), &[]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].content, "from input");
    }

    #[test]
    fn test_request_rejects_late_system_message() {
        let messages = vec![Message::user("q"), Message::system("late")];
        let err = CompletionRequest::new(messages, GenerationConfig::triage()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidRequest);
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("messages[1].role")
        );
    }

    #[test]
    fn test_request_rejects_empty() {
        assert!(CompletionRequest::new(Vec::new(), GenerationConfig::chat()).is_err());
    }

    #[test]
    fn test_generation_presets() {
        assert_eq!(GenerationConfig::triage().max_tokens, 500);
        assert_eq!(GenerationConfig::chat().max_tokens, 400);
        assert_eq!(GenerationConfig::chat().top_p, 0.9);
        assert!(GenerationConfig::default().reasoning);
    }
}
