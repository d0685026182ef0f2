use crate::client::types::{AttemptRecord, CallStats};
use crate::error::{CandidateError, Error, ErrorContext};
use crate::request::{CompletionRequest, GenerationConfig};
use crate::transport::{ChoiceMessage, CompletionTransport};
use crate::types::{CompletionResult, Message, ModelCandidate};
use crate::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Completion client with ordered fail-fast fallback over its candidates.
///
/// All state is read-only after construction, so one client (or clones of it)
/// can serve any number of concurrent callers.
#[derive(Clone)]
pub struct CompletionClient {
    pub(crate) candidates: Arc<[ModelCandidate]>,
    pub(crate) transport: Arc<dyn CompletionTransport>,
    pub(crate) timeout: Duration,
    pub(crate) generation: GenerationConfig,
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("candidates", &self.candidates)
            .field("timeout", &self.timeout)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl CompletionClient {
    pub(crate) fn new(
        candidates: Vec<ModelCandidate>,
        transport: Arc<dyn CompletionTransport>,
        timeout: Duration,
        generation: GenerationConfig,
    ) -> Result<Self> {
        if candidates.is_empty() {
            return Err(Error::configuration_with_context(
                "at least one model candidate is required",
                ErrorContext::new()
                    .with_field_path("candidates")
                    .with_source("completion_client"),
            ));
        }
        Ok(Self {
            candidates: candidates.into(),
            transport,
            timeout,
            generation,
        })
    }

    pub fn candidates(&self) -> &[ModelCandidate] {
        &self.candidates
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Default generation parameters for requests this client composes itself.
    pub fn generation(&self) -> &GenerationConfig {
        &self.generation
    }

    /// Run `request` through the candidates in order until one succeeds.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult> {
        Ok(self
            .complete_with_stats(request, &CancellationToken::new())
            .await?
            .0)
    }

    /// Raw chat entry point: already-composed messages plus generation parameters.
    pub async fn complete_messages(
        &self,
        messages: Vec<Message>,
        generation: GenerationConfig,
    ) -> Result<CompletionResult> {
        let request = CompletionRequest::new(messages, generation)?;
        self.complete(&request).await
    }

    /// Like [`complete`](Self::complete), but stops with [`Error::Cancelled`] once `cancel` fires.
    pub async fn complete_with_cancel(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<CompletionResult> {
        Ok(self.complete_with_stats(request, cancel).await?.0)
    }

    /// Ordered fail-fast fallback, returning per-call stats on success.
    ///
    /// Each candidate gets exactly one attempt bounded by the client timeout.
    /// Failures are logged and the next candidate is tried; the last failure is
    /// returned inside [`Error::AllProvidersExhausted`].
    pub async fn complete_with_stats(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<(CompletionResult, CallStats)> {
        let started = Instant::now();
        let mut failed_attempts: Vec<AttemptRecord> = Vec::new();
        let mut last_err: Option<CandidateError> = None;

        for candidate in self.candidates.iter() {
            if cancel.is_cancelled() {
                warn!(model = candidate.id(), "completion cancelled before attempt");
                return Err(Error::Cancelled { model: None });
            }

            let request_id = Uuid::new_v4().to_string();
            let attempt_started = Instant::now();
            info!(
                model = candidate.id(),
                attempt = candidate.rank(),
                request_id = request_id.as_str(),
                "attempting completion"
            );

            let attempt = tokio::time::timeout(
                self.timeout,
                self.transport.send(candidate.id(), request, &request_id),
            );
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!(model = candidate.id(), "completion cancelled in flight");
                    return Err(Error::Cancelled {
                        model: Some(candidate.id().to_string()),
                    });
                }
                res = attempt => res,
            };

            let err = match outcome {
                Ok(Ok(ChoiceMessage {
                    content: Some(content),
                    reasoning_details,
                })) => {
                    let duration_ms = started.elapsed().as_millis();
                    info!(
                        model = candidate.id(),
                        attempt = candidate.rank(),
                        duration_ms,
                        "completion succeeded"
                    );
                    let result = CompletionResult {
                        content,
                        model: candidate.id().to_string(),
                        reasoning_details,
                    };
                    let stats = CallStats {
                        model: candidate.id().to_string(),
                        rank: candidate.rank(),
                        failed_attempts,
                        request_id,
                        duration_ms,
                    };
                    return Ok((result, stats));
                }
                Ok(Ok(ChoiceMessage { content: None, .. })) => CandidateError::MalformedEnvelope {
                    message: "choices[0].message has no content".to_string(),
                },
                Ok(Err(e)) => e,
                Err(_) => CandidateError::Timeout {
                    after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                },
            };

            let duration_ms = attempt_started.elapsed().as_millis();
            warn!(
                model = candidate.id(),
                attempt = candidate.rank(),
                error_kind = err.kind().as_str(),
                duration_ms,
                error = %err,
                "candidate failed, trying next"
            );
            failed_attempts.push(AttemptRecord {
                model: candidate.id().to_string(),
                error_kind: err.kind(),
                duration_ms,
            });
            last_err = Some(err);
        }

        match last_err {
            Some(last) => {
                error!(
                    attempts = failed_attempts.len(),
                    duration_ms = started.elapsed().as_millis(),
                    last_error = %last,
                    "all model candidates failed"
                );
                Err(Error::AllProvidersExhausted {
                    attempts: failed_attempts.len(),
                    last,
                })
            }
            None => Err(Error::configuration_with_context(
                "no model candidates configured",
                ErrorContext::new()
                    .with_field_path("candidates")
                    .with_source("completion_client"),
            )),
        }
    }
}
