//! Triage record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity as reported by the model.
///
/// The model is asked for mild/moderate/severe but may answer anything; unknown
/// values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    Other(String),
}

impl Severity {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mild" => Severity::Mild,
            "moderate" => Severity::Moderate,
            "severe" => Severity::Severe,
            _ => Severity::Other(raw.to_string()),
        }
    }
}

/// One candidate illness. Missing sub-fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Illness {
    pub name: String,
    /// Percentage string, e.g. "80%".
    pub confidence: String,
    pub severity: String,
    pub description: String,
}

impl Illness {
    pub fn severity_level(&self) -> Severity {
        Severity::parse(&self.severity)
    }
}

/// Validated triage output. Every field is always materialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredPrediction {
    pub illnesses: Vec<Illness>,
    pub medications: Vec<String>,
    pub home_remedies: Vec<String>,
    pub precautions: Vec<String>,
    pub emergency_signs: Vec<String>,
    pub doctor_specialist: String,
    pub when_to_consult: String,
    pub disclaimer: String,
}

impl StructuredPrediction {
    /// Most likely illness, if the model named any.
    pub fn primary_illness(&self) -> Option<&Illness> {
        self.illnesses.first()
    }
}

/// What a prediction route hands back: the record plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    #[serde(flatten)]
    pub prediction: StructuredPrediction,
    #[serde(rename = "modelUsed")]
    pub model_used: String,
    pub reasoning_details: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}
