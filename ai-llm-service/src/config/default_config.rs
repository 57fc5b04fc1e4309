//! Default Gemini config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `GEMINI_API_KEY`    = API key (optional at load time; calls fail with a
//!   configuration error while it is missing)
//! - `GEMINI_API_URL`    = REST base (default `https://generativelanguage.googleapis.com/v1`)
//! - `GEMINI_MODEL`      = model id (default `gemini-1.5-pro`)
//! - `LLM_MAX_TOKENS`    = max output tokens (default 1000)
//! - `LLM_TIMEOUT_SECS`  = per-request timeout (default 30)
//! - `LLM_MAX_RETRIES`   = retries after transient failures (default 1)
//! - `LLM_RETRY_BACKOFF_MS` = base backoff (default 500)

use crate::{
    config::gemini_config::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiConfig, GenerationParams},
    error_handler::{Result, opt_u32, opt_u64, opt_var},
};

/// Builds a [`GeminiConfig`] from variables looked up through `vars`
/// (the binary passes [`crate::error_handler::process_env`]).
///
/// # Errors
/// - [`crate::ConfigError::InvalidNumber`] for unparsable numeric variables
/// - [`crate::ConfigError::InvalidFormat`] for a non-http(s) `GEMINI_API_URL`
pub fn config_gemini_from<F>(vars: &F) -> Result<GeminiConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = GeminiConfig::default();

    let cfg = GeminiConfig {
        endpoint: opt_var(vars, "GEMINI_API_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        model: opt_var(vars, "GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        api_key: opt_var(vars, "GEMINI_API_KEY"),
        generation: GenerationParams {
            max_output_tokens: opt_u32(vars, "LLM_MAX_TOKENS")?
                .unwrap_or(defaults.generation.max_output_tokens),
            ..GenerationParams::default()
        },
        safety_threshold: defaults.safety_threshold,
        timeout_secs: opt_u64(vars, "LLM_TIMEOUT_SECS")?.unwrap_or(defaults.timeout_secs),
        max_retries: opt_u32(vars, "LLM_MAX_RETRIES")?.unwrap_or(defaults.max_retries),
        retry_backoff_ms: opt_u64(vars, "LLM_RETRY_BACKOFF_MS")?
            .unwrap_or(defaults.retry_backoff_ms),
    };

    cfg.validate()?;
    Ok(cfg)
}
