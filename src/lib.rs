//! # medibridge-ai
//!
//! Completion client behind MediBridge's symptom triage and chat assistant.
//!
//! ## Overview
//!
//! Requests go to an OpenRouter-style chat-completions endpoint. The client
//! holds an ordered list of model candidates and tries them one at a time: the
//! first well-formed response wins, a failing candidate is never retried, and
//! when every candidate has failed the caller gets
//! [`Error::AllProvidersExhausted`] with the last failure inside.
//!
//! For triage, the raw text then goes through [`structured::extract`] (first
//! `{` to last `}`) and [`structured::validate`] (required `illnesses`, empty
//! defaults for the rest).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use medibridge_ai::CompletionClientBuilder;
//!
//! #[tokio::main]
//! async fn main() -> medibridge_ai::Result<()> {
//!     let client = CompletionClientBuilder::from_env()?
//!         .with_api_key("sk-or-...")
//!         .build()?;
//!
//!     let prediction = client.predict("fever and sore throat for two days").await?;
//!     for illness in &prediction.illnesses {
//!         println!("{} ({}, {})", illness.name, illness.confidence, illness.severity);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`request`] | Message composition and generation parameters |
//! | [`client`] | Fallback orchestrator and builder |
//! | [`transport`] | Provider boundary and HTTP implementation |
//! | [`structured`] | Payload extraction, validation, prediction types |
//! | [`triage`] | `predict` use case |
//! | [`chat`] | Chat widget use case |
//! | [`config`] | Configuration sources |
//! | [`types`] | Messages, candidates, completion results |

pub mod chat;
pub mod client;
pub mod config;
pub mod request;
pub mod structured;
pub mod transport;
pub mod triage;
pub mod types;

// Re-export main types for convenience
pub use chat::{ChatReply, ChatSession, ChatTurn};
pub use client::{CallStats, CompletionClient, CompletionClientBuilder};
pub use config::ClientConfig;
pub use request::{compose, CompletionRequest, GenerationConfig};
pub use structured::{PredictionReport, StructuredPrediction};
pub use triage::Symptoms;
pub use types::{CompletionResult, Message, MessageRole, ModelCandidate};

/// Re-exported so callers can cancel without depending on tokio-util directly.
pub use tokio_util::sync::CancellationToken;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{CandidateError, Error, ErrorContext, ErrorKind};
