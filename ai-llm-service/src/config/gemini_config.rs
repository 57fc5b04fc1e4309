use std::fmt;

use serde::Serialize;

use crate::error_handler::{ConfigError, Result, validate_http_endpoint, validate_range_f32};

/// Default REST base for the Generative Language API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1";

/// Default model used by the plant assistant.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Sampling and length limits sent as `generationConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Sampling temperature; kept low for factual answers.
    pub temperature: f32,
    /// Top-K sampling cutoff.
    pub top_k: u32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1000,
        }
    }
}

/// Harm categories covered by the safety settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

impl HarmCategory {
    /// Every category the proxy thresholds, in request order.
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ];
}

/// Blocking threshold applied to each [`HarmCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyThreshold {
    BlockLowAndAbove,
    #[default]
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
}

/// Immutable settings for [`crate::GeminiService`].
///
/// Resolved once at process start (see [`crate::config_gemini_from`]) and passed
/// explicitly; request handling never reads the environment.
///
/// `api_key` is optional on purpose: a missing key is reported per call as a
/// configuration error instead of aborting startup.
#[derive(Clone)]
pub struct GeminiConfig {
    /// REST base, e.g. `https://generativelanguage.googleapis.com/v1`.
    pub endpoint: String,
    /// Model identifier, e.g. `gemini-1.5-pro`.
    pub model: String,
    /// API key passed as the `key` query parameter.
    pub api_key: Option<String>,
    pub generation: GenerationParams,
    pub safety_threshold: SafetyThreshold,
    /// Per-request HTTP timeout.
    pub timeout_secs: u64,
    /// Extra attempts after a transient failure (0 disables retry).
    pub max_retries: u32,
    /// Base delay for exponential backoff between attempts.
    pub retry_backoff_ms: u64,
}

impl GeminiConfig {
    /// Returns the API key when it is present and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Validates endpoint scheme, model name and sampling ranges.
    ///
    /// # Errors
    /// Returns [`crate::AiLlmError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        validate_http_endpoint("GEMINI_API_URL", self.endpoint.trim())?;
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        validate_range_f32("temperature", self.generation.temperature, 0.0, 2.0)?;
        validate_range_f32("top_p", self.generation.top_p, 0.0, 1.0)?;
        if self.generation.max_output_tokens == 0 {
            return Err(ConfigError::OutOfRange {
                field: "max_output_tokens",
                detail: "expected a positive token count",
            }
            .into());
        }
        Ok(())
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            generation: GenerationParams::default(),
            safety_threshold: SafetyThreshold::default(),
            timeout_secs: 30,
            max_retries: 1,
            retry_backoff_ms: 500,
        }
    }
}

// The key must never reach logs.
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("generation", &self.generation)
            .field("safety_threshold", &self.safety_threshold)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_api_key() {
        let cfg = GeminiConfig {
            api_key: Some("secret-key-123".into()),
            ..GeminiConfig::default()
        };
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("secret-key-123"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = GeminiConfig {
            api_key: Some("   ".into()),
            ..GeminiConfig::default()
        };
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn default_config_is_valid() {
        assert!(GeminiConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_http_endpoint_and_empty_model() {
        let bad_endpoint = GeminiConfig {
            endpoint: "ftp://example.com".into(),
            ..GeminiConfig::default()
        };
        assert!(bad_endpoint.validate().is_err());

        let empty_model = GeminiConfig {
            model: " ".into(),
            ..GeminiConfig::default()
        };
        assert!(empty_model.validate().is_err());
    }

    #[test]
    fn safety_threshold_serializes_in_api_casing() {
        let v = serde_json::to_value(SafetyThreshold::BlockMediumAndAbove).unwrap();
        assert_eq!(v, "BLOCK_MEDIUM_AND_ABOVE");
        let c = serde_json::to_value(HarmCategory::DangerousContent).unwrap();
        assert_eq!(c, "HARM_CATEGORY_DANGEROUS_CONTENT");
    }
}
