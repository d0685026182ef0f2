//! Error classification: pure mapping from low-level faults to [`CandidateError`].

use crate::error::CandidateError;
use crate::transport::{ChatEnvelope, ChoiceMessage};

/// Longest provider body kept in an error detail.
const MAX_DETAIL_CHARS: usize = 512;

fn truncate_detail(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_DETAIL_CHARS {
        return body.to_string();
    }
    let mut s: String = body.chars().take(MAX_DETAIL_CHARS).collect();
    s.push_str("...");
    s
}

/// Classify a non-success HTTP status and its body.
pub(crate) fn classify_status(
    status: u16,
    body: &str,
    retry_after_secs: Option<u64>,
) -> CandidateError {
    if status == 429 {
        return CandidateError::RateLimited {
            message: truncate_detail(body),
            retry_after_secs,
        };
    }
    CandidateError::Network {
        status: Some(status),
        message: truncate_detail(body),
    }
}

/// Classify a transport-level failure (no usable HTTP response).
pub(crate) fn classify_transport(err: &reqwest::Error, timeout_ms: u64) -> CandidateError {
    if err.is_timeout() {
        return CandidateError::Timeout {
            after_ms: timeout_ms,
        };
    }
    CandidateError::Network {
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}

/// Parse a success body; anything without `choices[0].message.content` is malformed.
pub(crate) fn classify_envelope(body: &str) -> Result<ChoiceMessage, CandidateError> {
    let envelope: ChatEnvelope =
        serde_json::from_str(body).map_err(|e| CandidateError::MalformedEnvelope {
            message: format!("unparseable response body: {}", e),
        })?;

    let message = envelope
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .ok_or_else(|| CandidateError::MalformedEnvelope {
            message: format!("missing choices[0].message in {}", truncate_detail(body)),
        })?;

    if message.content.is_none() {
        return Err(CandidateError::MalformedEnvelope {
            message: "choices[0].message has no content".to_string(),
        });
    }
    Ok(message)
}

/// Parse a `Retry-After` header given in seconds.
pub(crate) fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_429_is_rate_limited() {
        let e = classify_status(429, r#"{"error":"slow down"}"#, Some(7));
        assert_eq!(e.kind(), ErrorKind::UpstreamRateLimited);
        assert_eq!(
            e,
            CandidateError::RateLimited {
                message: r#"{"error":"slow down"}"#.to_string(),
                retry_after_secs: Some(7),
            }
        );
    }

    #[test]
    fn test_other_statuses_are_network_errors() {
        for status in [400u16, 401, 404, 500, 502, 503] {
            let e = classify_status(status, "nope", None);
            assert_eq!(e.kind(), ErrorKind::NetworkError, "status {}", status);
        }
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "x".repeat(2_000);
        match classify_status(500, &body, None) {
            CandidateError::Network { message, .. } => {
                assert_eq!(message.chars().count(), MAX_DETAIL_CHARS + 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_envelope_success() {
        let body = r#"{"choices":[{"message":{"content":"hello","reasoning_details":[{"text":"t"}]}}]}"#;
        let msg = classify_envelope(body).unwrap();
        assert_eq!(msg.content.as_deref(), Some("hello"));
        assert!(msg.reasoning_details.is_some());
    }

    #[test]
    fn test_envelope_failures() {
        let cases = [
            "not json",
            "{}",
            r#"{"choices":[]}"#,
            r#"{"choices":[{}]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
        ];
        for body in cases {
            let e = classify_envelope(body).unwrap_err();
            assert_eq!(e.kind(), ErrorKind::MalformedEnvelope, "body {}", body);
        }
    }
}
