//! Symptom triage: fixed system prompt, completion, then extraction and
//! validation into a [`StructuredPrediction`].

use crate::error::{Error, ErrorContext};
use crate::request::CompletionRequest;
use crate::structured::{extract, validate, PredictionReport, StructuredPrediction};
use crate::types::CompletionResult;
use crate::{CompletionClient, Result};
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub const TRIAGE_SYSTEM_PROMPT: &str = r#"You are an advanced medical assistant AI.
Analyze symptoms and provide guidance. Never provide definitive diagnosis.
Suggest OTC medications and recommend specialists.
Always return structured JSON. Do not include any text before or after the JSON block.

REQUIRED JSON FORMAT:
{
  "illnesses": [
    {
      "name": "Illness Name",
      "confidence": "90%",
      "severity": "mild/moderate/severe",
      "description": "Short description"
    }
  ],
  "medications": ["OTC Drug 1", "OTC Drug 2"],
  "home_remedies": ["Remedy 1"],
  "precautions": ["Precaution 1"],
  "emergency_signs": ["Sign 1"],
  "doctor_specialist": "Dermatologist/Neurologist/etc",
  "when_to_consult": "Consult if symptoms persist...",
  "disclaimer": "This information is for educational purposes only..."
}"#;

const USER_PROMPT_PREFIX: &str = "Analyze the following symptoms and provide medical guidance: ";

/// Symptoms as submitted by a form: one free-text field or a list of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symptoms {
    Text(String),
    List(Vec<String>),
}

impl Symptoms {
    /// Single line of symptom text; list items are joined with `", "`.
    pub fn as_text(&self) -> String {
        match self {
            Symptoms::Text(t) => t.trim().to_string(),
            Symptoms::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_text().is_empty()
    }

    pub fn user_prompt(&self) -> String {
        format!("{}{}", USER_PROMPT_PREFIX, self.as_text())
    }
}

impl From<&str> for Symptoms {
    fn from(s: &str) -> Self {
        Symptoms::Text(s.to_string())
    }
}

impl From<String> for Symptoms {
    fn from(s: String) -> Self {
        Symptoms::Text(s)
    }
}

impl From<Vec<String>> for Symptoms {
    fn from(items: Vec<String>) -> Self {
        Symptoms::List(items)
    }
}

impl From<&[&str]> for Symptoms {
    fn from(items: &[&str]) -> Self {
        Symptoms::List(items.iter().map(|s| s.to_string()).collect())
    }
}

impl CompletionClient {
    /// Triage free-text symptoms into a validated prediction.
    pub async fn predict(&self, symptoms: impl Into<Symptoms>) -> Result<StructuredPrediction> {
        Ok(self
            .predict_report_with_cancel(symptoms, &CancellationToken::new())
            .await?
            .prediction)
    }

    /// Triage and keep provenance (model, reasoning trace, timestamp).
    pub async fn predict_report(&self, symptoms: impl Into<Symptoms>) -> Result<PredictionReport> {
        self.predict_report_with_cancel(symptoms, &CancellationToken::new())
            .await
    }

    pub async fn predict_report_with_cancel(
        &self,
        symptoms: impl Into<Symptoms>,
        cancel: &CancellationToken,
    ) -> Result<PredictionReport> {
        let request = self.triage_request(&symptoms.into())?;
        let result = self.complete_with_cancel(&request, cancel).await?;
        let prediction = prediction_from(&result)?;

        info!(
            model = result.model.as_str(),
            illnesses = prediction.illnesses.len(),
            "triage prediction ready"
        );
        Ok(PredictionReport {
            prediction,
            model_used: result.model,
            reasoning_details: result.reasoning_details,
            timestamp: Utc::now(),
        })
    }

    /// Compose the triage request without sending it.
    pub fn triage_request(&self, symptoms: &Symptoms) -> Result<CompletionRequest> {
        if symptoms.is_blank() {
            return Err(Error::invalid_request_with_context(
                "please provide symptoms",
                ErrorContext::new()
                    .with_field_path("symptoms")
                    .with_source("triage"),
            ));
        }
        CompletionRequest::compose(
            symptoms.user_prompt(),
            Some(TRIAGE_SYSTEM_PROMPT),
            &[],
            self.generation,
        )
    }
}

fn prediction_from(result: &CompletionResult) -> Result<StructuredPrediction> {
    extract(&result.content)
        .and_then(validate)
        .map_err(|e| {
            // raw model output stays in the logs
            warn!(
                model = result.model.as_str(),
                error_kind = e.kind().as_str(),
                content = result.content.as_str(),
                "model output rejected"
            );
            e
        })
}
