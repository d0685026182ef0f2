use thiserror::Error;

/// Text surfaced to end users whenever a terminal error reaches the caller.
///
/// Provider bodies and low-level details are logged, never shown.
pub const USER_FACING_FAILURE: &str = "Analysis temporarily unavailable. Please try again later.";

/// Structured error context for configuration and request-shape errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "config.base_url", "messages[2].role")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "client_builder", "request_composer")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

/// Failure of a single candidate attempt.
///
/// These are intermediate: the orchestrator logs them and moves on. Only the
/// last one escapes, wrapped in [`Error::AllProvidersExhausted`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CandidateError {
    #[error("network error{}: {message}", format_status(.status))]
    Network {
        status: Option<u16>,
        message: String,
    },

    #[error("no response within {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("upstream rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after_secs: Option<u64>,
    },

    #[error("malformed envelope: {message}")]
    MalformedEnvelope { message: String },
}

fn format_status(status: &Option<u16>) -> String {
    match status {
        Some(s) => format!(" (HTTP {})", s),
        None => String::new(),
    }
}

impl CandidateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CandidateError::Network { .. } => ErrorKind::NetworkError,
            CandidateError::Timeout { .. } => ErrorKind::Timeout,
            CandidateError::RateLimited { .. } => ErrorKind::UpstreamRateLimited,
            CandidateError::MalformedEnvelope { .. } => ErrorKind::MalformedEnvelope,
        }
    }
}

/// Closed error taxonomy.
///
/// `Configuration` and `InvalidRequest` sit outside the provider taxonomy: they
/// are raised before any candidate is contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NetworkError,
    Timeout,
    UpstreamRateLimited,
    MalformedEnvelope,
    NoStructuredPayloadFound,
    MalformedPayload,
    SchemaViolation,
    AllProvidersExhausted,
    Cancelled,
    Configuration,
    InvalidRequest,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NetworkError => "network_error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::UpstreamRateLimited => "upstream_rate_limited",
            ErrorKind::MalformedEnvelope => "malformed_envelope",
            ErrorKind::NoStructuredPayloadFound => "no_structured_payload_found",
            ErrorKind::MalformedPayload => "malformed_payload",
            ErrorKind::SchemaViolation => "schema_violation",
            ErrorKind::AllProvidersExhausted => "all_providers_exhausted",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Configuration => "configuration",
            ErrorKind::InvalidRequest => "invalid_request",
        }
    }

    /// Per-candidate kinds never reach a caller on their own.
    pub fn is_per_candidate(&self) -> bool {
        matches!(
            self,
            ErrorKind::NetworkError
                | ErrorKind::Timeout
                | ErrorKind::UpstreamRateLimited
                | ErrorKind::MalformedEnvelope
        )
    }
}

impl serde::Serialize for ErrorKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type returned to callers of the completion client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("all {attempts} model candidates failed; last error: {last}")]
    AllProvidersExhausted {
        attempts: usize,
        #[source]
        last: CandidateError,
    },

    #[error("no structured payload found in model output: {preview:?}")]
    NoStructuredPayloadFound { preview: String },

    #[error("model payload is not valid JSON: {source}")]
    MalformedPayload {
        #[source]
        source: serde_json::Error,
    },

    #[error("schema violation: {message}{}", format_field(.field_path))]
    SchemaViolation {
        message: String,
        field_path: Option<String>,
    },

    #[error("completion cancelled{}", format_model(.model))]
    Cancelled { model: Option<String> },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Invalid request: {message}{}", format_context(.context))]
    InvalidRequest {
        message: String,
        context: ErrorContext,
    },
}

fn format_field(field: &Option<String>) -> String {
    match field {
        Some(f) => format!(" (field: {})", f),
        None => String::new(),
    }
}

fn format_model(model: &Option<String>) -> String {
    match model {
        Some(m) => format!(" while waiting on {}", m),
        None => String::new(),
    }
}

impl Error {
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn invalid_request_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::InvalidRequest {
            message: msg.into(),
            context,
        }
    }

    pub fn schema_violation(msg: impl Into<String>, field_path: impl Into<String>) -> Self {
        Error::SchemaViolation {
            message: msg.into(),
            field_path: Some(field_path.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::AllProvidersExhausted { .. } => ErrorKind::AllProvidersExhausted,
            Error::NoStructuredPayloadFound { .. } => ErrorKind::NoStructuredPayloadFound,
            Error::MalformedPayload { .. } => ErrorKind::MalformedPayload,
            Error::SchemaViolation { .. } => ErrorKind::SchemaViolation,
            Error::Cancelled { .. } => ErrorKind::Cancelled,
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::InvalidRequest { .. } => ErrorKind::InvalidRequest,
        }
    }

    /// Whether this is one of the terminal, caller-visible outcomes of a completion.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::AllProvidersExhausted
                | ErrorKind::SchemaViolation
                | ErrorKind::NoStructuredPayloadFound
                | ErrorKind::MalformedPayload
                | ErrorKind::Cancelled
        )
    }

    /// The last per-candidate failure, when every candidate was exhausted.
    pub fn last_candidate_error(&self) -> Option<&CandidateError> {
        match self {
            Error::AllProvidersExhausted { last, .. } => Some(last),
            _ => None,
        }
    }

    /// Short generic text for end users. Diagnostics go through [`Error::kind`].
    pub fn user_message(&self) -> &'static str {
        USER_FACING_FAILURE
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::InvalidRequest { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }
}
