//! Chat widget use case: assistant persona, transcript history, raw text reply.

use crate::error::{Error, ErrorContext};
use crate::request::{CompletionRequest, GenerationConfig};
use crate::types::{CompletionResult, Message};
use crate::{CompletionClient, Result};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::warn;

pub const CHAT_SYSTEM_PROMPT: &str = r#"You are Medron, a helpful AI medical assistant. Provide small, precise, and point-based answers.

GUIDELINES:
- Be extremely concise and precise. No long stories or unnecessary fillers.
- Use bullet points for clarity. Focus ONLY on important medical points.
- Only answer medical/health questions
- For non-medical questions, say: "I can only assist with medical and health-related queries."
- Provide accurate medical information
- Always include a disclaimer at the end
- Use emojis to be "amusing" and friendly.

HOW TO ANSWER:

1. For SYMPTOMS (e.g., "I have fever and headache"):
   - Identify possible conditions/diseases
   - Explain what each condition is
   - Suggest urgency level
   - Recommend what to do
   - Give general precautions

2. For TABLET/MEDICINE questions (e.g., "What is Dolo 650?"):
   - Explain what the medicine is
   - What it's used for (which diseases/conditions)
   - How it works
   - Common side effects
   - Important precautions
   - When to consult a doctor

3. For GENERAL health questions:
   - Give direct, helpful answers
   - Explain in simple terms
   - Provide practical advice

4. For EMERGENCY symptoms (chest pain, stroke, severe bleeding, breathing difficulty):
   - Immediately say: "🚨 This may be a medical emergency. Seek immediate medical attention."

DISCLAIMER TO INCLUDE:
"This information is for educational purposes only and is not a medical diagnosis. Please consult a qualified healthcare professional.""#;

/// Shown in place of a reply when every candidate failed.
pub const CHAT_APOLOGY: &str = "I apologize, but I'm having trouble connecting right now. Please try again or consult a doctor directly. 👨‍⚕️";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

/// One line of the widget transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(rename = "type")]
    pub speaker: Speaker,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_details: Option<serde_json::Value>,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            reasoning_details: None,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: text.into(),
            reasoning_details: None,
        }
    }

    /// Bot turn built from a completion, keeping its reasoning trace for the next request.
    pub fn from_result(result: &CompletionResult) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: result.content.clone(),
            reasoning_details: result.reasoning_details.clone(),
        }
    }

    pub fn to_message(&self) -> Message {
        match self.speaker {
            Speaker::User => Message::user(self.text.clone()),
            Speaker::Bot => {
                Message::assistant(self.text.clone()).with_reasoning(self.reasoning_details.clone())
            }
        }
    }
}

/// Reply shown in the widget; `model` is `None` for the apology fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub text: String,
    pub reasoning_details: Option<serde_json::Value>,
    pub model: Option<String>,
}

/// Chat front end over a shared [`CompletionClient`].
#[derive(Debug, Clone)]
pub struct ChatSession {
    client: CompletionClient,
    system_prompt: String,
    generation: GenerationConfig,
}

impl ChatSession {
    pub fn new(client: CompletionClient) -> Self {
        Self {
            client,
            system_prompt: CHAT_SYSTEM_PROMPT.to_string(),
            generation: GenerationConfig::chat(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Input is trimmed; blank input is rejected before anything is sent.
    pub fn request(&self, transcript: &[ChatTurn], input: &str) -> Result<CompletionRequest> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::invalid_request_with_context(
                "please enter a message",
                ErrorContext::new()
                    .with_field_path("input")
                    .with_source("chat"),
            ));
        }
        let history: Vec<Message> = transcript.iter().map(ChatTurn::to_message).collect();
        CompletionRequest::compose(
            input,
            Some(self.system_prompt.as_str()),
            &history,
            self.generation,
        )
    }

    pub async fn reply(&self, transcript: &[ChatTurn], input: &str) -> Result<CompletionResult> {
        self.reply_with_cancel(transcript, input, &CancellationToken::new())
            .await
    }

    pub async fn reply_with_cancel(
        &self,
        transcript: &[ChatTurn],
        input: &str,
        cancel: &CancellationToken,
    ) -> Result<CompletionResult> {
        let request = self.request(transcript, input)?;
        self.client.complete_with_cancel(&request, cancel).await
    }

    /// Never fails: on any error the widget's apology text is returned.
    pub async fn reply_or_apology(&self, transcript: &[ChatTurn], input: &str) -> ChatReply {
        match self.reply(transcript, input).await {
            Ok(result) => ChatReply {
                text: result.content,
                reasoning_details: result.reasoning_details,
                model: Some(result.model),
            },
            Err(e) => {
                warn!(error_kind = e.kind().as_str(), error = %e, "chat reply failed");
                ChatReply {
                    text: CHAT_APOLOGY.to_string(),
                    reasoning_details: None,
                    model: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageRole;
    use serde_json::json;

    #[test]
    fn test_turn_roles() {
        assert_eq!(ChatTurn::user("hi").to_message().role, MessageRole::User);
        assert_eq!(ChatTurn::bot("hello").to_message().role, MessageRole::Assistant);
    }

    #[test]
    fn test_bot_turn_carries_reasoning() {
        let result = CompletionResult {
            content: "Rest and fluids".to_string(),
            model: "m1".to_string(),
            reasoning_details: Some(json!([{"type": "reasoning.text", "text": "..."}])),
        };
        let msg = ChatTurn::from_result(&result).to_message();
        assert_eq!(msg.content, "Rest and fluids");
        assert!(msg.reasoning_details.is_some());
    }

    #[test]
    fn test_transcript_deserializes_widget_shape() {
        let turns: Vec<ChatTurn> = serde_json::from_value(json!([
            {"type": "bot", "text": "Hello! I'm Medron."},
            {"type": "user", "text": "What is Dolo 650?"}
        ]))
        .unwrap();
        assert_eq!(turns[0].speaker, Speaker::Bot);
        assert_eq!(turns[1].text, "What is Dolo 650?");
    }
}
