use crate::client::error_classification::{
    classify_envelope, classify_status, classify_transport, retry_after_secs,
};
use crate::config::ClientConfig;
use crate::error::{CandidateError, Error, ErrorContext};
use crate::request::CompletionRequest;
use crate::Result;
use async_trait::async_trait;
use reqwest::Proxy;
use std::env;
use std::time::Duration;

use super::{ChoiceMessage, CompletionTransport, ProviderRequest};

/// reqwest-backed transport for an OpenRouter-style `/chat/completions` endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    referer: Option<String>,
    title: Option<String>,
    timeout_ms: u64,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig, api_key: Option<String>) -> Result<Self> {
        Self::with_timeout(config, api_key, config.timeout())
    }

    /// Like [`new`](Self::new) with an exact per-request timeout instead of `timeout_secs`.
    pub fn with_timeout(
        config: &ClientConfig,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(
                env::var("MEDIBRIDGE_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(8),
            )
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Ok(proxy_url) = env::var("MEDIBRIDGE_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder.build().map_err(|e| {
            Error::configuration_with_context(
                "failed to build HTTP client",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("http_transport"),
            )
        })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            referer: config.referer.clone(),
            title: config.title.clone(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn send(
        &self,
        model: &str,
        request: &CompletionRequest,
        request_id: &str,
    ) -> std::result::Result<ChoiceMessage, CandidateError> {
        let body = ProviderRequest::new(model, request);

        let mut req = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .header("x-request-id", request_id);

        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        if let Some(referer) = &self.referer {
            req = req.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            req = req.header("X-Title", title);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| classify_transport(&e, self.timeout_ms))?;

        let status = resp.status();
        let retry_after = retry_after_secs(resp.headers());
        let text = resp
            .text()
            .await
            .map_err(|e| classify_transport(&e, self.timeout_ms))?;

        if !status.is_success() {
            return Err(classify_status(status.as_u16(), &text, retry_after));
        }

        classify_envelope(&text)
    }
}
