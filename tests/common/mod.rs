//! Scripted in-memory transport for orchestration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use medibridge_ai::transport::{ChoiceMessage, CompletionTransport};
use medibridge_ai::{CandidateError, CompletionClient, CompletionClientBuilder, CompletionRequest};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a model does when called.
#[derive(Debug, Clone)]
pub enum Behavior {
    Reply(String),
    Fail(CandidateError),
    /// Answers with a choice whose message has no content.
    NoContent,
    /// Never answers within any reasonable test timeout.
    Hang,
}

pub struct ScriptedTransport {
    script: HashMap<String, Behavior>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new<I>(script: I) -> Arc<Self>
    where
        I: IntoIterator<Item = (&'static str, Behavior)>,
    {
        Arc::new(Self {
            script: script
                .into_iter()
                .map(|(m, b)| (m.to_string(), b))
                .collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Models called so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionTransport for ScriptedTransport {
    async fn send(
        &self,
        model: &str,
        _request: &CompletionRequest,
        _request_id: &str,
    ) -> Result<ChoiceMessage, CandidateError> {
        self.calls.lock().unwrap().push(model.to_string());
        match self.script.get(model).cloned() {
            Some(Behavior::Reply(text)) => Ok(ChoiceMessage::text(text)),
            Some(Behavior::Fail(e)) => Err(e),
            Some(Behavior::NoContent) => Ok(ChoiceMessage {
                content: None,
                reasoning_details: None,
            }),
            Some(Behavior::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(CandidateError::Network {
                    status: None,
                    message: "unreachable".to_string(),
                })
            }
            None => Err(CandidateError::Network {
                status: Some(404),
                message: format!("unknown model {}", model),
            }),
        }
    }
}

pub fn client_with(
    transport: Arc<ScriptedTransport>,
    candidates: &[&str],
    timeout: Duration,
) -> CompletionClient {
    CompletionClientBuilder::new()
        .with_candidates(candidates.iter().copied())
        .timeout(timeout)
        .transport(transport)
        .build()
        .expect("client should build")
}

pub fn server_error(status: u16) -> Behavior {
    Behavior::Fail(CandidateError::Network {
        status: Some(status),
        message: "upstream failure".to_string(),
    })
}

pub const COMMON_COLD_REPLY: &str = r#"Sure! {"illnesses":[{"name":"Common Cold","confidence":"80%","severity":"mild","description":"Viral upper respiratory infection"}],"medications":[],"home_remedies":[],"precautions":[],"emergency_signs":[],"doctor_specialist":"General Physician","when_to_consult":"if symptoms persist beyond 5 days","disclaimer":"Educational purposes only."} Hope that helps!"#;
