//! Transport-agnostic text generation seam.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error_handler::Result;

/// Why the upstream stopped generating the first candidate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    FinishReasonUnspecified,
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Language,
    Blocklist,
    ProhibitedContent,
    Spii,
    MalformedFunctionCall,
    #[serde(other)]
    Other,
}

impl FinishReason {
    /// `STOP` and `MAX_TOKENS` are the expected outcomes; anything else means
    /// the text may be partial or filtered.
    pub fn is_expected(&self) -> bool {
        matches!(self, FinishReason::Stop | FinishReason::MaxTokens)
    }

    /// Wire name, e.g. `SAFETY`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishReason::FinishReasonUnspecified => "FINISH_REASON_UNSPECIFIED",
            FinishReason::Stop => "STOP",
            FinishReason::MaxTokens => "MAX_TOKENS",
            FinishReason::Safety => "SAFETY",
            FinishReason::Recitation => "RECITATION",
            FinishReason::Language => "LANGUAGE",
            FinishReason::Blocklist => "BLOCKLIST",
            FinishReason::ProhibitedContent => "PROHIBITED_CONTENT",
            FinishReason::Spii => "SPII",
            FinishReason::MalformedFunctionCall => "MALFORMED_FUNCTION_CALL",
            FinishReason::Other => "OTHER",
        }
    }
}

/// Text extracted from the first candidate of a generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// First part's text; may be empty.
    pub text: String,
    /// Reported finish reason, if the upstream sent one.
    pub finish_reason: Option<FinishReason>,
}

/// Anything that turns a prompt into generated text.
///
/// [`crate::GeminiService`] is the production implementation; tests plug in
/// in-memory fakes.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt` upstream and returns the first candidate's text.
    async fn generate(&self, prompt: &str) -> Result<Generation>;
}
