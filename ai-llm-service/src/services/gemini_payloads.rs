//! Wire model for `models/{model}:generateContent`.
//!
//! The response side is an explicit `Candidate → Content → Part` tree; every
//! shape check happens in [`GenerateContentResponse::into_generation`] so the
//! rest of the code never pokes at optional fields.

use serde::{Deserialize, Serialize};

use crate::{
    config::gemini_config::{GeminiConfig, HarmCategory, SafetyThreshold},
    error_handler::ProviderError,
    generator::{FinishReason, Generation},
};

/* ===========================================================================
Request
======================================================================== */

/// Request body for `generateContent` (single user turn).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

impl<'a> GenerateContentRequest<'a> {
    /// Builds the body from config and the already-rendered prompt.
    pub(crate) fn from_cfg(cfg: &GeminiConfig, prompt: &'a str) -> Self {
        let g = cfg.generation;
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: g.temperature,
                top_k: g.top_k,
                top_p: g.top_p,
                max_output_tokens: g.max_output_tokens,
            },
            safety_settings: HarmCategory::ALL
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: cfg.safety_threshold,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: HarmCategory,
    threshold: SafetyThreshold,
}

/* ===========================================================================
Response
======================================================================== */

/// Minimal response for `generateContent`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<FinishReason>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Validates the shape and extracts the first candidate's first part.
    ///
    /// Rules, in order:
    /// - no candidates → [`ProviderError::EmptyCandidates`]
    /// - no content parts → [`ProviderError::MissingContent`], keeping the
    ///   finish reason so callers can report why
    /// - otherwise the first part's text (a missing `text` reads as empty)
    ///
    /// An unexpected finish reason is reported on the [`Generation`], not
    /// treated as a failure.
    pub(crate) fn into_generation(self) -> Result<Generation, ProviderError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(ProviderError::EmptyCandidates {
                block_reason: self.prompt_feedback.and_then(|f| f.block_reason),
            });
        };

        let finish_reason = candidate.finish_reason;
        let Some(part) = candidate.content.and_then(|c| c.parts.into_iter().next()) else {
            return Err(ProviderError::MissingContent { finish_reason });
        };

        Ok(Generation {
            text: part.text.unwrap_or_default(),
            finish_reason,
        })
    }
}
