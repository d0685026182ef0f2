use crate::client::core::CompletionClient;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorContext};
use crate::request::GenerationConfig;
use crate::transport::{CompletionTransport, HttpTransport};
use crate::types::ModelCandidate;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Builder for [`CompletionClient`].
///
/// Starts from [`ClientConfig::default`]; call [`from_env`](Self::from_env) or
/// [`with_config`](Self::with_config) to load other sources first.
pub struct CompletionClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn CompletionTransport>>,
    timeout_override: Option<Duration>,
}

impl CompletionClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            transport: None,
            timeout_override: None,
        }
    }

    /// Start from defaults overlaid with `MEDIBRIDGE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new().with_config(ClientConfig::from_env()?))
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Candidate model ids, in fallback order.
    pub fn with_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Override the provider base URL (primarily for testing with mock servers).
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self.timeout_override = None;
        self
    }

    /// Sub-second per-candidate timeout; takes precedence over `timeout_secs`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_override = Some(timeout);
        self
    }

    pub fn generation(mut self, generation: GenerationConfig) -> Self {
        self.config.generation = generation;
        self
    }

    /// Identifying headers sent with every request; `None` omits them.
    pub fn app_identity(mut self, referer: Option<String>, title: Option<String>) -> Self {
        self.config.referer = referer;
        self.config.title = title;
        self
    }

    /// Replace the HTTP transport, e.g. with a scripted one in tests.
    pub fn transport(mut self, transport: Arc<dyn CompletionTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<CompletionClient> {
        let mut config = self.config;
        if let Some(t) = self.timeout_override {
            if t.is_zero() {
                return Err(Error::configuration_with_context(
                    "timeout must be greater than zero",
                    ErrorContext::new()
                        .with_field_path("timeout")
                        .with_source("client_builder"),
                ));
            }
            // whole seconds, rounded up; the exact value is used below
            config.timeout_secs = t.as_secs() + u64::from(t.subsec_nanos() > 0);
        }
        config.validate()?;

        let timeout = self.timeout_override.unwrap_or_else(|| config.timeout());
        let transport: Arc<dyn CompletionTransport> = match self.transport {
            Some(t) => t,
            None => {
                let api_key = config.resolve_api_key();
                if api_key.is_none() {
                    warn!("no API key configured; requests will be sent unauthenticated");
                }
                Arc::new(HttpTransport::with_timeout(&config, api_key, timeout)?)
            }
        };

        CompletionClient::new(
            ModelCandidate::ranked(config.candidates),
            transport,
            timeout,
            config.generation,
        )
    }
}

impl Default for CompletionClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
