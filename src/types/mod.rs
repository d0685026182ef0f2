//! Core value types shared by the composer, orchestrator and use cases.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | Chat message with role, content and optional reasoning trace |
//! | [`MessageRole`] | `system`, `user` or `assistant` |
//! | [`ModelCandidate`] | One backing model in the fallback order |
//! | [`CompletionResult`] | Raw text plus the model that produced it |

pub mod message;

pub use message::{Message, MessageRole};

use serde::{Deserialize, Serialize};

/// One backing model the orchestrator may try, with its rank in the fallback order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelCandidate {
    id: String,
    rank: usize,
}

impl ModelCandidate {
    pub fn new(id: impl Into<String>, rank: usize) -> Self {
        Self {
            id: id.into(),
            rank,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Rank candidates by list position.
    pub fn ranked<I, S>(ids: I) -> Vec<ModelCandidate>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ids.into_iter()
            .enumerate()
            .map(|(rank, id)| ModelCandidate::new(id, rank))
            .collect()
    }
}

impl std::fmt::Display for ModelCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

/// Output of one successful completion.
///
/// `model` is always one of the client's configured candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResult {
    pub content: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_details: Option<serde_json::Value>,
}
