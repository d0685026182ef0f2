//! Permissive validation of extracted triage payloads.
//!
//! Only `illnesses` is required. Everything else degrades to an empty value
//! when missing or mis-shaped, since partial guidance is still shown to users.

use crate::error::Error;
use crate::structured::prediction::{Illness, StructuredPrediction};
use crate::Result;
use serde_json::{Map, Value};
use tracing::debug;

const LIST_FIELDS: [&str; 4] = ["medications", "home_remedies", "precautions", "emergency_signs"];
const SCALAR_FIELDS: [&str; 3] = ["doctor_specialist", "when_to_consult", "disclaimer"];

/// Parse and validate payload text into a [`StructuredPrediction`].
pub fn validate(payload: &str) -> Result<StructuredPrediction> {
    let value: Value =
        serde_json::from_str(payload).map_err(|source| Error::MalformedPayload { source })?;
    validate_value(&value)
}

/// Validate an already-parsed payload.
pub fn validate_value(value: &Value) -> Result<StructuredPrediction> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::schema_violation("payload must be a JSON object", "$"))?;

    let illnesses: Vec<Illness> = match obj.get("illnesses") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| illness_from(idx, item))
            .collect(),
        Some(_) => {
            return Err(Error::schema_violation(
                "required field must be a list",
                "illnesses",
            ))
        }
        None => return Err(Error::schema_violation("missing required field", "illnesses")),
    };

    let [medications, home_remedies, precautions, emergency_signs] =
        LIST_FIELDS.map(|field| string_list(obj, field));
    let [doctor_specialist, when_to_consult, disclaimer] =
        SCALAR_FIELDS.map(|field| scalar(obj, field));

    Ok(StructuredPrediction {
        illnesses,
        medications,
        home_remedies,
        precautions,
        emergency_signs,
        doctor_specialist,
        when_to_consult,
        disclaimer,
    })
}

fn illness_from(idx: usize, item: &Value) -> Illness {
    match item {
        Value::Object(fields) => {
            let confidence = match fields.get("confidence") {
                Some(Value::Number(n)) => format!("{}%", n),
                _ => scalar(fields, "confidence"),
            };
            Illness {
                name: scalar(fields, "name"),
                confidence,
                severity: scalar(fields, "severity"),
                description: scalar(fields, "description"),
            }
        }
        Value::String(name) => {
            debug!(index = idx, "illness given as bare string");
            Illness {
                name: name.clone(),
                ..Illness::default()
            }
        }
        other => {
            debug!(index = idx, value = %other, "illness entry has no usable fields");
            Illness::default()
        }
    }
}

fn scalar(obj: &Map<String, Value>, field: &str) -> String {
    match obj.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        Some(Value::Null) | None => {
            debug!(field, "defaulting missing field to empty string");
            String::new()
        }
        Some(other) => {
            debug!(field, value = %other, "defaulting mis-shaped field to empty string");
            String::new()
        }
    }
}

fn string_list(obj: &Map<String, Value>, field: &str) -> Vec<String> {
    match obj.get(field) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        Some(Value::Null) | None => {
            debug!(field, "defaulting missing list to empty");
            Vec::new()
        }
        Some(other) => {
            debug!(field, value = %other, "defaulting mis-shaped list to empty");
            Vec::new()
        }
    }
}
