//! Client configuration.
//!
//! Sources, lowest precedence first: built-in defaults, a YAML file, the
//! environment, then explicit builder calls.
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `MEDIBRIDGE_BASE_URL` | Provider base URL |
//! | `MEDIBRIDGE_MODELS` | Comma-separated candidate list, in fallback order |
//! | `MEDIBRIDGE_TIMEOUT_SECS` | Per-candidate timeout |
//! | `OPENROUTER_API_KEY` | API key, when no keyring entry exists |

use crate::error::{Error, ErrorContext};
use crate::request::GenerationConfig;
use crate::Result;
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CANDIDATES: [&str; 3] = [
    "nvidia/nemotron-3-nano-30b-a3b:free",
    "openai/gpt-oss-20b:free",
    "arcee-ai/trinity-mini:free",
];

const KEYRING_SERVICE: &str = "medibridge";
const KEYRING_USER: &str = "openrouter";
const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub candidates: Vec<String>,
    pub timeout_secs: u64,
    pub generation: GenerationConfig,
    /// Sent as `HTTP-Referer`; the provider uses it for app attribution.
    pub referer: Option<String>,
    /// Sent as `X-Title`.
    pub title: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            candidates: DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            generation: GenerationConfig::triage(),
            referer: Some("https://medibridge.com".to_string()),
            title: Some("MediBridge Health".to_string()),
        }
    }
}

impl ClientConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                "invalid client configuration",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("config_yaml"),
            )
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                "cannot read configuration file",
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_details(e.to_string())
                    .with_source("config_file"),
            )
        })?;
        Self::from_yaml_str(&text)
    }

    /// Defaults overlaid with the environment.
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env()
    }

    pub fn apply_env(self) -> Result<Self> {
        self.apply_vars(|key| env::var(key).ok())
    }

    fn apply_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = var("MEDIBRIDGE_BASE_URL") {
            self.base_url = url;
        }
        if let Some(models) = var("MEDIBRIDGE_MODELS") {
            let parsed: Vec<String> = models
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !parsed.is_empty() {
                self.candidates = parsed;
            }
        }
        if let Some(raw) = var("MEDIBRIDGE_TIMEOUT_SECS") {
            self.timeout_secs = raw.trim().parse::<u64>().map_err(|_| {
                Error::configuration_with_context(
                    "timeout must be a whole number of seconds",
                    ErrorContext::new()
                        .with_field_path("MEDIBRIDGE_TIMEOUT_SECS")
                        .with_details(raw.clone())
                        .with_source("config_env"),
                )
            })?;
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Explicit key, else the OS keyring, else `OPENROUTER_API_KEY`.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            return Some(key.clone());
        }

        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER) {
            if let Ok(key) = entry.get_password() {
                return Some(key);
            }
        }

        env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty())
    }

    /// Check values that would otherwise only fail on the first request.
    pub fn validate(&self) -> Result<()> {
        if self.candidates.is_empty() {
            return Err(Error::configuration_with_context(
                "at least one model candidate is required",
                ErrorContext::new()
                    .with_field_path("config.candidates")
                    .with_source("client_config"),
            ));
        }
        if let Some(idx) = self.candidates.iter().position(|c| c.trim().is_empty()) {
            return Err(Error::configuration_with_context(
                "model candidate ids must not be blank",
                ErrorContext::new()
                    .with_field_path(format!("config.candidates[{}]", idx))
                    .with_source("client_config"),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "timeout must be greater than zero",
                ErrorContext::new()
                    .with_field_path("config.timeout_secs")
                    .with_source("client_config"),
            ));
        }
        url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                "invalid provider base URL",
                ErrorContext::new()
                    .with_field_path("config.base_url")
                    .with_details(e.to_string())
                    .with_source("client_config"),
            )
        })?;
        Ok(())
    }
}
