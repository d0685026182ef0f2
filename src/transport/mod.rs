//! Upstream chat-completions boundary.
//!
//! [`CompletionTransport`] is the single suspension point of a completion: one
//! call sends one request to one model. [`HttpTransport`] is the production
//! implementation; tests inject scripted transports.

pub mod http;

pub use http::HttpTransport;

use crate::error::CandidateError;
use crate::request::CompletionRequest;
use crate::types::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sends one request to one model.
///
/// Implementations must classify every failure into a [`CandidateError`];
/// the orchestrator owns timeouts and fallback.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn send(
        &self,
        model: &str,
        request: &CompletionRequest,
        request_id: &str,
    ) -> std::result::Result<ChoiceMessage, CandidateError>;
}

/// Request body in the provider's chat-completions shape.
#[derive(Debug, Serialize)]
pub struct ProviderRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub reasoning: ReasoningFlag,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReasoningFlag {
    pub enabled: bool,
}

impl<'a> ProviderRequest<'a> {
    pub fn new(model: &'a str, request: &'a CompletionRequest) -> Self {
        let generation = request.generation();
        Self {
            model,
            messages: request.messages(),
            temperature: generation.temperature,
            max_tokens: generation.max_tokens,
            top_p: generation.top_p,
            reasoning: ReasoningFlag {
                enabled: generation.reasoning,
            },
        }
    }
}

/// Top-level response structure: `{choices: [{message: {...}}]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatEnvelope {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

/// Model output for one choice. The reasoning trace is present only for
/// models that produce one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning_details: Option<serde_json::Value>,
}

impl ChoiceMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            reasoning_details: None,
        }
    }
}
