//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library, and groups domain-specific errors in nested enums ([`ConfigError`],
//! [`ProviderError`], [`HealthError`]). Small helpers for reading/validating
//! configuration variables are provided and return the unified [`Result<T>`] alias.
//!
//! Messages never contain the API key: request URLs are stored without the
//! `key` query parameter and transport errors are stripped of their URL.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::generator::FinishReason;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup or missing secrets).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Upstream answered, but with a bad status or an unexpected payload.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Health-check/connectivity/decoding errors.
    #[error(transparent)]
    Health(#[from] HealthError),

    /// Underlying HTTP transport error (connect, reset, body read).
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[source] reqwest::Error),

    /// Operation exceeded the configured timeout.
    #[error("[AI LLM Service] operation timed out after {0:?}")]
    Timeout(Duration),
}

impl AiLlmError {
    /// Whether another attempt may succeed: network failures, HTTP 429 and 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            AiLlmError::HttpTransport(_) => true,
            AiLlmError::Provider(ProviderError::HttpStatus(e)) => {
                e.status == StatusCode::TOO_MANY_REQUESTS || e.status.is_server_error()
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for AiLlmError {
    fn from(e: reqwest::Error) -> Self {
        AiLlmError::HttpTransport(e.without_url())
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required variable is missing or empty.
    #[error("[AI LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (like timeouts or token limits).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        var: &'static str,
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        field: &'static str,
        detail: &'static str,
    },

    /// Model name was empty.
    #[error("[AI LLM Service] model name must not be empty")]
    EmptyModel,
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// Non-success HTTP status with a short body snippet.
#[derive(Debug, Clone, Error)]
#[error("HTTP {status} from {url}: {snippet}")]
pub struct HttpError {
    /// Numeric HTTP status code.
    pub status: StatusCode,
    /// Request URL (without the `key` query parameter).
    pub url: String,
    /// Short, trimmed snippet of the response body.
    pub snippet: String,
}

/// Errors produced while talking to the generative-text endpoint.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Upstream returned a non-successful HTTP status.
    #[error("[AI LLM Service] {0}")]
    HttpStatus(HttpError),

    /// Body was not valid JSON for the expected response model.
    #[error("[AI LLM Service] failed to decode response: {0}")]
    Decode(String),

    /// `candidates` was missing or empty (often a blocked prompt).
    #[error("[AI LLM Service] response contained no candidates{}", block_suffix(.block_reason))]
    EmptyCandidates { block_reason: Option<String> },

    /// First candidate had no `content.parts`. A blocked or filtered
    /// candidate usually reports why in `finish_reason`.
    #[error("[AI LLM Service] first candidate has no content parts{}", finish_suffix(.finish_reason))]
    MissingContent { finish_reason: Option<FinishReason> },
}

fn finish_suffix(reason: &Option<FinishReason>) -> String {
    reason
        .as_ref()
        .map(|r| format!(" (finish reason: {})", r.as_str()))
        .unwrap_or_default()
}

fn block_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(" (prompt blocked: {r})"))
        .unwrap_or_default()
}

/* ------------------------------------------------------------------------- */
/* Health errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for provider health checks.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HealthError {
    /// The endpoint is empty or does not start with http/https.
    #[error("[AI LLM Service] invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Upstream returned a non-successful HTTP status.
    #[error("[AI LLM Service] {0}")]
    HttpStatus(HttpError),
}

/// Trims a response body down to a log-friendly snippet.
pub fn make_snippet(text: &str) -> String {
    const MAX: usize = 240;
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        let mut s: String = trimmed.chars().take(MAX).collect();
        s.push('…');
        s
    }
}

/* ------------------------------------------------------------------------- */
/* Variable helpers (return unified `Result<T>`)                             */
/* ------------------------------------------------------------------------- */

/// Reads a variable from the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Returns a non-blank variable from `vars`, or `None`.
pub fn opt_var<F>(vars: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    vars(name).filter(|v| !v.trim().is_empty())
}

/// Parses an optional `u32` (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if set but not a valid `u32`.
pub fn opt_u32<F>(vars: &F, name: &'static str) -> Result<Option<u32>>
where
    F: Fn(&str) -> Option<String>,
{
    match opt_var(vars, name) {
        Some(v) => v.trim().parse::<u32>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        None => Ok(None),
    }
}

/// Parses an optional `u64` (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if set but not a valid `u64`.
pub fn opt_u64<F>(vars: &F, name: &'static str) -> Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    match opt_var(vars, name) {
        Some(v) => v.trim().parse::<u64>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        None => Ok(None),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers (return unified `Result<T>`)                           */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] otherwise.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
///
/// # Errors
/// Returns [`ConfigError::OutOfRange`] if `value` is outside `[min, max]`.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn opt_var_treats_blank_as_unset() {
        let v = vars(&[("A", "  "), ("B", "x")]);
        assert_eq!(opt_var(&v, "A"), None);
        assert_eq!(opt_var(&v, "B").as_deref(), Some("x"));
    }

    #[test]
    fn opt_u32_parses_and_reports_garbage() {
        let v = vars(&[("N", " 42 "), ("BAD", "forty")]);
        assert_eq!(opt_u32(&v, "N").unwrap(), Some(42));
        assert_eq!(opt_u32(&v, "MISSING").unwrap(), None);
        assert!(opt_u32(&v, "BAD").is_err());
    }

    #[test]
    fn snippet_is_trimmed_and_bounded() {
        assert_eq!(make_snippet("  hi \n"), "hi");
        let long = "x".repeat(1000);
        let s = make_snippet(&long);
        assert_eq!(s.chars().count(), 241);
        assert!(s.ends_with('…'));
    }

    #[test]
    fn only_throttling_and_server_errors_are_transient() {
        let http = |code: u16| {
            AiLlmError::Provider(ProviderError::HttpStatus(HttpError {
                status: StatusCode::from_u16(code).unwrap(),
                url: "http://x".into(),
                snippet: String::new(),
            }))
        };
        assert!(http(429).is_transient());
        assert!(http(503).is_transient());
        assert!(!http(400).is_transient());
        assert!(!AiLlmError::Timeout(Duration::from_secs(1)).is_transient());
        assert!(!AiLlmError::from(ProviderError::MissingContent { finish_reason: None }).is_transient());
    }

    #[test]
    fn empty_candidates_message_mentions_block_reason() {
        let e = ProviderError::EmptyCandidates {
            block_reason: Some("SAFETY".into()),
        };
        assert!(e.to_string().contains("prompt blocked: SAFETY"));
        let plain = ProviderError::EmptyCandidates { block_reason: None };
        assert!(!plain.to_string().contains("blocked"));
    }
}
