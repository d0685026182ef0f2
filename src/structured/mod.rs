//! Structured triage output recovered from free-form model text.
//!
//! - [`extract`]: slice out the embedded JSON object
//! - [`validate`]: check it against the triage schema, defaulting optional fields
//!
//! # Examples
//!
//! ```
//! use medibridge_ai::structured::{extract, validate};
//!
//! let raw = r#"Sure! {"illnesses":[{"name":"Common Cold","confidence":"80%","severity":"mild","description":"viral"}]} Hope that helps!"#;
//! let prediction = validate(extract(raw)?)?;
//!
//! assert_eq!(prediction.illnesses[0].name, "Common Cold");
//! assert!(prediction.medications.is_empty());
//! # Ok::<(), medibridge_ai::Error>(())
//! ```

pub mod extract;
pub mod prediction;
pub mod validator;

pub use extract::extract;
pub use prediction::{Illness, PredictionReport, Severity, StructuredPrediction};
pub use validator::{validate, validate_value};

use crate::Result;

/// Extract then validate in one step.
pub fn parse_prediction(raw: &str) -> Result<StructuredPrediction> {
    validate(extract(raw)?)
}
