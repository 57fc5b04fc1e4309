//! Gemini service for single-turn text generation.
//!
//! Minimal, non-streaming client around the Generative Language REST API:
//! - POST {endpoint}/models/{model}:generateContent?key=…: text generation
//!
//! Constructor validation:
//! - `cfg.endpoint` must start with http:// or https://
//! - `cfg.model` must be non-empty
//! - sampling parameters must be in range
//!
//! The API key is checked per call, before any I/O, so a process started
//! without it still serves requests and reports a configuration error.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use tracing::{debug, error, info, warn};

use crate::{
    config::gemini_config::GeminiConfig,
    error_handler::{AiLlmError, ConfigError, HttpError, ProviderError, Result, make_snippet},
    generator::{Generation, TextGenerator},
    services::gemini_payloads::{GenerateContentRequest, GenerateContentResponse},
};

/// Largest backoff exponent between retries (base × 2^5).
const MAX_BACKOFF_SHIFT: u32 = 5;

/// Thin client for the Gemini `generateContent` endpoint.
///
/// Keeps a preconfigured `reqwest::Client` (timeout + default headers).
#[derive(Debug)]
pub struct GeminiService {
    client: reqwest::Client,
    cfg: GeminiConfig,
    url_generate: String,
    timeout: Duration,
}

impl GeminiService {
    /// Creates a new [`GeminiService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Config`] if the endpoint, model or sampling params are invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: GeminiConfig) -> Result<Self> {
        cfg.validate()?;

        let timeout = Duration::from_secs(cfg.timeout_secs.max(1));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = cfg.endpoint.trim().trim_end_matches('/');
        let url_generate = format!("{}/models/{}:generateContent", base, cfg.model.trim());

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            max_retries = cfg.max_retries,
            has_api_key = cfg.api_key().is_some(),
            "GeminiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_generate,
            timeout,
        })
    }

    /// One POST to `generateContent`, no retry.
    async fn generate_once(&self, api_key: &str, body: &GenerateContentRequest<'_>) -> Result<Generation> {
        let started = Instant::now();

        let resp = self
            .client
            .post(&self.url_generate)
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_generate.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "Gemini generateContent returned non-success status"
            );

            return Err(ProviderError::HttpStatus(HttpError {
                status,
                url,
                snippet,
            })
            .into());
        }

        let bytes = resp.bytes().await.map_err(|e| self.map_transport(e))?;
        let out: GenerateContentResponse = serde_json::from_slice(&bytes).map_err(|e| {
            error!(
                error = %e,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                snippet = %make_snippet(&String::from_utf8_lossy(&bytes)),
                "failed to decode generateContent response"
            );
            ProviderError::Decode(format!(
                "serde error: {e}; expected `candidates[0].content.parts[0].text`"
            ))
        })?;

        let generation = out.into_generation().inspect_err(|e| {
            error!(
                error = %e,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "unexpected generateContent response structure"
            );
        })?;

        debug!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            text_len = generation.text.len(),
            "generateContent completed"
        );

        Ok(generation)
    }

    fn map_transport(&self, e: reqwest::Error) -> AiLlmError {
        if e.is_timeout() {
            AiLlmError::Timeout(self.timeout)
        } else {
            AiLlmError::from(e)
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(MAX_BACKOFF_SHIFT);
        Duration::from_millis(self.cfg.retry_backoff_ms.saturating_mul(1 << shift))
    }
}

#[async_trait]
impl TextGenerator for GeminiService {
    /// Performs a **non-streaming** `generateContent` call.
    ///
    /// Network failures, HTTP 429 and 5xx are retried up to
    /// `cfg.max_retries` times with exponential backoff. Other statuses,
    /// decode failures and timeouts fail immediately.
    ///
    /// # Errors
    /// - [`ConfigError::MissingVar`] when no API key is configured (no I/O is done)
    /// - [`ProviderError::HttpStatus`] for non-2xx responses
    /// - [`ProviderError::Decode`] / [`ProviderError::EmptyCandidates`] /
    ///   [`ProviderError::MissingContent`] for malformed bodies
    /// - [`AiLlmError::Timeout`] when the client timeout elapses
    /// - [`AiLlmError::HttpTransport`] for other network failures
    async fn generate(&self, prompt: &str) -> Result<Generation> {
        let api_key = self
            .cfg
            .api_key()
            .ok_or(ConfigError::MissingVar("GEMINI_API_KEY"))?;

        let body = GenerateContentRequest::from_cfg(&self.cfg, prompt);

        debug!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            "POST {}", self.url_generate
        );

        let mut attempt = 0;
        loop {
            if attempt > 0 {
                tokio::time::sleep(self.backoff(attempt)).await;
            }

            match self.generate_once(api_key, &body).await {
                Ok(generation) => return Ok(generation),
                Err(e) if e.is_transient() && attempt < self.cfg.max_retries => {
                    attempt += 1;
                    warn!(
                        error = %e,
                        attempt,
                        max_retries = self.cfg.max_retries,
                        "transient generateContent failure; retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_url_is_built_without_key() {
        let svc = GeminiService::new(GeminiConfig {
            endpoint: "https://example.test/v1/".into(),
            model: "gemini-1.5-pro".into(),
            api_key: Some("k".into()),
            ..GeminiConfig::default()
        })
        .unwrap();
        assert_eq!(
            svc.url_generate,
            "https://example.test/v1/models/gemini-1.5-pro:generateContent"
        );
        assert!(!svc.url_generate.contains("key="));
    }

    #[test]
    fn backoff_grows_exponentially_and_is_capped() {
        let svc = GeminiService::new(GeminiConfig {
            retry_backoff_ms: 100,
            ..GeminiConfig::default()
        })
        .unwrap();
        assert_eq!(svc.backoff(1), Duration::from_millis(100));
        assert_eq!(svc.backoff(2), Duration::from_millis(200));
        assert_eq!(svc.backoff(3), Duration::from_millis(400));
        assert_eq!(svc.backoff(40), Duration::from_millis(3200));
    }

    #[test]
    fn rejects_invalid_endpoint() {
        let err = GeminiService::new(GeminiConfig {
            endpoint: "localhost:1234".into(),
            ..GeminiConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, AiLlmError::Config(ConfigError::InvalidFormat { .. })));
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        // Port 9 (discard) would fail the connect; the error must be config, not transport.
        let svc = GeminiService::new(GeminiConfig {
            endpoint: "http://127.0.0.1:9".into(),
            api_key: None,
            ..GeminiConfig::default()
        })
        .unwrap();
        let err = svc.generate("hi").await.unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingVar("GEMINI_API_KEY"))
        ));
    }
}
