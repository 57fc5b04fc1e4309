//! Typed error for the plant-qa crate.

use std::time::Duration;

use ai_llm_service::{AiLlmError, ConfigError, ProviderError};
use thiserror::Error;

/// Every way a query can fail. Each variant carries a human-readable message
/// that is safe to show to the caller (no keys, no upstream URLs).
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Missing or blank query text.
    #[error("{0}")]
    InvalidInput(String),

    /// The proxy itself is misconfigured (e.g. no upstream key).
    #[error("Server configuration error: {0}")]
    ServerConfiguration(String),

    /// Upstream answered with a non-success status.
    #[error("Gemini API request failed with status {status} {reason}")]
    UpstreamHttp { status: u16, reason: String },

    /// Upstream answered 2xx but the body had no usable candidate text.
    #[error("Unexpected response format from Gemini API: {0}")]
    UpstreamFormat(String),

    /// No answer within the deadline.
    #[error("Gemini API did not respond within {} seconds", .0.as_secs_f32())]
    UpstreamTimeout(Duration),

    /// Anything else.
    #[error("{0}")]
    Unknown(String),
}

impl ProxyError {
    /// Stable machine-readable code, used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            ProxyError::InvalidInput(_) => "INVALID_INPUT",
            ProxyError::ServerConfiguration(_) => "SERVER_CONFIGURATION_ERROR",
            ProxyError::UpstreamHttp { .. } => "UPSTREAM_HTTP_ERROR",
            ProxyError::UpstreamFormat(_) => "UPSTREAM_FORMAT_ERROR",
            ProxyError::UpstreamTimeout(_) => "UPSTREAM_TIMEOUT",
            ProxyError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// Whether the failure was caused by the request itself.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ProxyError::InvalidInput(_))
    }
}

impl From<AiLlmError> for ProxyError {
    fn from(e: AiLlmError) -> Self {
        match e {
            AiLlmError::Config(ConfigError::MissingVar(name)) => {
                ProxyError::ServerConfiguration(format!("{name} is not configured"))
            }
            AiLlmError::Config(other) => ProxyError::ServerConfiguration(other.to_string()),
            AiLlmError::Provider(ProviderError::HttpStatus(http)) => ProxyError::UpstreamHttp {
                status: http.status.as_u16(),
                reason: http
                    .status
                    .canonical_reason()
                    .unwrap_or("Unknown Status")
                    .to_string(),
            },
            AiLlmError::Provider(ProviderError::EmptyCandidates { block_reason }) => {
                ProxyError::UpstreamFormat(match block_reason {
                    Some(reason) => format!("no candidates returned (prompt blocked: {reason})"),
                    None => "no candidates returned".to_string(),
                })
            }
            AiLlmError::Provider(ProviderError::MissingContent { finish_reason }) => {
                ProxyError::UpstreamFormat(match finish_reason {
                    Some(reason) => format!(
                        "first candidate has no content parts (finish reason: {})",
                        reason.as_str()
                    ),
                    None => "first candidate has no content parts".to_string(),
                })
            }
            AiLlmError::Provider(ProviderError::Decode(msg)) => {
                ProxyError::UpstreamFormat(format!("could not decode body: {msg}"))
            }
            AiLlmError::Timeout(after) => ProxyError::UpstreamTimeout(after),
            AiLlmError::HttpTransport(err) => {
                ProxyError::Unknown(format!("network error while calling Gemini API: {err}"))
            }
            other => ProxyError::Unknown(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::HttpError;

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = ProxyError::from(AiLlmError::from(ConfigError::MissingVar("GEMINI_API_KEY")));
        assert_eq!(err.code(), "SERVER_CONFIGURATION_ERROR");
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn http_status_keeps_code_and_reason() {
        let err = ProxyError::from(AiLlmError::from(ProviderError::HttpStatus(HttpError {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            url: "http://upstream/models/x:generateContent".into(),
            snippet: "overloaded".into(),
        })));
        assert_eq!(err.to_string(), "Gemini API request failed with status 503 Service Unavailable");
        assert!(!err.to_string().contains("upstream"));
    }

    #[test]
    fn format_errors_read_differently_from_http_errors() {
        let empty = ProxyError::from(AiLlmError::from(ProviderError::EmptyCandidates {
            block_reason: Some("SAFETY".into()),
        }));
        assert_eq!(empty.code(), "UPSTREAM_FORMAT_ERROR");
        assert!(empty.to_string().starts_with("Unexpected response format"));
        assert!(empty.to_string().contains("SAFETY"));
        assert!(!empty.is_client_error());
    }

    #[test]
    fn missing_content_names_the_finish_reason() {
        let err = ProxyError::from(AiLlmError::from(ProviderError::MissingContent {
            finish_reason: Some(ai_llm_service::FinishReason::Safety),
        }));
        assert_eq!(err.code(), "UPSTREAM_FORMAT_ERROR");
        assert!(err.to_string().contains("finish reason: SAFETY"));
    }

    #[test]
    fn timeout_is_reported_in_seconds() {
        let err = ProxyError::from(AiLlmError::Timeout(Duration::from_secs(30)));
        assert_eq!(err.to_string(), "Gemini API did not respond within 30 seconds");
    }
}
