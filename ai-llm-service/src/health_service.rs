//! Health probe for the Gemini backend.
//!
//! - `GET {endpoint}/models/{model}?key=…` (model metadata; proves key and model are valid)
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a `/health` endpoint.
//! [`HealthService::check`] is resilient and never fails (errors mapped to `ok=false`).

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::gemini_config::GeminiConfig;
use crate::error_handler::{AiLlmError, HealthError, HttpError, make_snippet};

/// A serializable health snapshot for the configured model.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Backend name.
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier the probe checked.
    pub model: String,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    #[inline]
    fn new(cfg: &GeminiConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: "Gemini".to_string(),
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Health checker that reuses a single HTTP client.
#[derive(Clone)]
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Checks that the configured model is reachable with the configured key.
    ///
    /// Never returns an error. A missing key is reported without any I/O.
    pub async fn check(&self, cfg: &GeminiConfig) -> HealthStatus {
        let Some(api_key) = cfg.api_key() else {
            warn!(model = %cfg.model, "health probe skipped: GEMINI_API_KEY is not configured");
            return HealthStatus::new(cfg, false, 0, "GEMINI_API_KEY is not configured");
        };

        let start = Instant::now();
        match self.try_probe(cfg, api_key).await {
            Ok(status) => {
                info!(
                    endpoint = %status.endpoint,
                    model = %status.model,
                    ok = status.ok,
                    latency_ms = status.latency_ms,
                    "health probe completed"
                );
                status
            }
            Err(err) => {
                let status = HealthStatus::new(cfg, false, start.elapsed().as_millis(), err.to_string());
                warn!(
                    endpoint = %status.endpoint,
                    model = %status.model,
                    latency_ms = status.latency_ms,
                    message = %status.message,
                    "health probe failed"
                );
                status
            }
        }
    }

    /// Strict probe. Returns an error on hard failures.
    async fn try_probe(&self, cfg: &GeminiConfig, api_key: &str) -> Result<HealthStatus, AiLlmError> {
        let endpoint = cfg.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(HealthError::InvalidEndpoint(cfg.endpoint.clone()).into());
        }

        let url = format!("{}/models/{}", endpoint.trim_end_matches('/'), cfg.model.trim());
        let timeout = Duration::from_secs(cfg.timeout_secs).min(self.default_timeout);

        let start = Instant::now();
        debug!(model = %cfg.model, "GET {}", url);

        let resp = self
            .client
            .get(&url)
            .query(&[("key", api_key)])
            .timeout(timeout)
            .send()
            .await?;

        let latency = start.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %url,
                %status,
                %snippet,
                latency_ms = latency,
                "health GET /models/{{model}} returned non-success status"
            );

            return Err(HealthError::HttpStatus(HttpError {
                status,
                url,
                snippet,
            })
            .into());
        }

        // Expected minimal JSON: { "name": "models/<model>", ... }
        #[derive(serde::Deserialize)]
        struct ModelInfo {
            name: Option<String>,
        }

        match resp.json::<ModelInfo>().await {
            Ok(info) => Ok(HealthStatus::new(
                cfg,
                true,
                latency,
                match info.name {
                    Some(name) => format!("Gemini is healthy; {name} is available"),
                    None => "Gemini is healthy".to_string(),
                },
            )),
            Err(e) => {
                warn!(
                    model = %cfg.model,
                    error = %e.without_url(),
                    latency_ms = latency,
                    "failed to decode model metadata; treating server as reachable"
                );
                Ok(HealthStatus::new(
                    cfg,
                    true,
                    latency,
                    "Gemini is reachable; model metadata could not be decoded",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_reports_unhealthy_without_io() {
        let svc = HealthService::new(Some(1)).unwrap();
        let cfg = GeminiConfig {
            endpoint: "http://127.0.0.1:9".into(),
            ..GeminiConfig::default()
        };
        let status = svc.check(&cfg).await;
        assert!(!status.ok);
        assert_eq!(status.latency_ms, 0);
        assert!(status.message.contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn non_http_endpoint_is_reported_without_io() {
        let svc = HealthService::new(Some(1)).unwrap();
        let cfg = GeminiConfig {
            endpoint: "generativelanguage.googleapis.com".into(),
            api_key: Some("k".into()),
            ..GeminiConfig::default()
        };
        let status = svc.check(&cfg).await;
        assert!(!status.ok);
        assert!(status.message.contains("invalid endpoint"), "{}", status.message);
    }
}
