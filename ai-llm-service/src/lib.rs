//! Shared LLM client for the plant Q&A proxy.
//!
//! Wraps the Gemini `generateContent` endpoint behind the [`TextGenerator`]
//! trait so callers can swap the transport in tests. Also provides the
//! environment-driven [`GeminiConfig`], a resilient [`HealthService`] and a
//! `tracing` layer used by the binary.

pub mod config;
pub mod error_handler;
pub mod generator;
pub mod health_service;
pub mod services;
pub mod telemetry;

pub use config::default_config::config_gemini_from;
pub use config::gemini_config::{
    GeminiConfig, GenerationParams, HarmCategory, SafetyThreshold,
};
pub use error_handler::{AiLlmError, ConfigError, HealthError, HttpError, ProviderError};
pub use generator::{FinishReason, Generation, TextGenerator};
pub use health_service::{HealthService, HealthStatus};
pub use services::gemini_service::GeminiService;
