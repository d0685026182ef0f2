//! Completion client: the provider fallback orchestrator and its builder.
//!
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;
pub(crate) mod error_classification;
pub mod types;

pub use builder::CompletionClientBuilder;
pub use core::CompletionClient;
pub use types::{AttemptRecord, CallStats};
