//! Locate a JSON object embedded in free-form model text.

use crate::error::Error;
use crate::Result;

const PREVIEW_CHARS: usize = 120;

/// Return the slice from the first `{` to the last `}` (inclusive).
///
/// No brace balancing: stray braces in surrounding prose end up inside the
/// slice and surface later as a parse failure.
pub fn extract(raw: &str) -> Result<&str> {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&raw[start..=end]),
        _ => Err(Error::NoStructuredPayloadFound {
            preview: preview(raw),
        }),
    }
}

fn preview(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= PREVIEW_CHARS {
        trimmed.to_string()
    } else {
        let mut s: String = trimmed.chars().take(PREVIEW_CHARS).collect();
        s.push_str("...");
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_bare_object() {
        assert_eq!(extract(r#"{"a":1}"#).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_surrounding_prose_removed() {
        let raw = "Sure! Here you go: {\"a\": {\"b\": 2}} Hope that helps!";
        assert_eq!(extract(raw).unwrap(), "{\"a\": {\"b\": 2}}");
    }

    #[test]
    fn test_markdown_fence() {
        let raw = "```json\n{\"illnesses\": []}\n```";
        assert_eq!(extract(raw).unwrap(), "{\"illnesses\": []}");
    }

    #[test]
    fn test_no_braces() {
        let err = extract("no braces here").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoStructuredPayloadFound);
    }

    #[test]
    fn test_only_one_side() {
        assert!(extract("open { only").is_err());
        assert!(extract("close } only").is_err());
        assert!(extract("} backwards {").is_err());
    }

    #[test]
    fn test_stray_brace_is_kept() {
        // first `{` wins even when it belongs to prose
        let raw = "use {braces} wisely: {\"a\":1}";
        assert_eq!(extract(raw).unwrap(), "{braces} wisely: {\"a\":1}");
    }

    #[test]
    fn test_multibyte_text() {
        let raw = "🤒 résumé {\"name\":\"fièvre\"} 👍";
        assert_eq!(extract(raw).unwrap(), "{\"name\":\"fièvre\"}");
    }
}
