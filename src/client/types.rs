use crate::error::ErrorKind;
use serde::Serialize;

/// One failed candidate attempt, as recorded by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub model: String,
    pub error_kind: ErrorKind,
    pub duration_ms: u128,
}

/// Per-call stats for a successful completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CallStats {
    /// Candidate that produced the result.
    pub model: String,
    /// Its rank in the fallback order (0 = first choice).
    pub rank: usize,
    /// Candidates that failed before the winner, in order.
    pub failed_attempts: Vec<AttemptRecord>,
    /// Correlation id sent with the winning attempt.
    pub request_id: String,
    pub duration_ms: u128,
}

impl CallStats {
    /// Total candidates contacted, including the winner.
    pub fn attempts(&self) -> usize {
        self.failed_attempts.len() + 1
    }
}
