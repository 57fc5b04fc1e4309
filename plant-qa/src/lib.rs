//! Contextual query proxy for medicinal plant questions.
//!
//! Public API: [`PlantQa::answer_query`]. It validates the question, builds a
//! prompt grounded in an optional [`SubjectRecord`], asks the configured
//! [`TextGenerator`] under a hard deadline and returns the answer text.
//! [`PlantQa::answer_with_enrichment`] additionally tries to resolve the
//! subject from the plant catalog when the caller did not send one.

mod cfg;
mod error;
mod prompt;
mod resolver;
mod subject;

pub use cfg::ProxySettings;
pub use error::ProxyError;
pub use prompt::{ANSWER_INSTRUCTIONS, GENERAL_FRAMING, SUBJECT_FRAMING, build_prompt, preview};
pub use resolver::{StoreSubjectResolver, SubjectResolver};
pub use subject::SubjectRecord;

use std::{sync::Arc, time::Instant};

use ai_llm_service::{AiLlmError, FinishReason, ProviderError, TextGenerator};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Stateless between requests: holds only the upstream seam, the optional
/// resolver and deadlines. Cheap to share behind an `Arc`.
#[derive(Clone)]
pub struct PlantQa {
    generator: Arc<dyn TextGenerator>,
    resolver: Option<Arc<dyn SubjectResolver>>,
    settings: ProxySettings,
}

impl PlantQa {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: ProxySettings) -> Self {
        Self {
            generator,
            resolver: None,
            settings,
        }
    }

    /// Enables catalog enrichment for [`Self::answer_with_enrichment`].
    pub fn with_resolver(mut self, resolver: Arc<dyn SubjectResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn settings(&self) -> &ProxySettings {
        &self.settings
    }

    /// Answers `query`, grounded in `subject` when given.
    ///
    /// Exactly one upstream generation call per valid query (transport
    /// retries aside); none for an invalid one. A finish reason other than
    /// `STOP`/`MAX_TOKENS` still returns the (possibly partial) text.
    ///
    /// # Errors
    /// - [`ProxyError::InvalidInput`] for a missing or blank query
    /// - [`ProxyError::UpstreamTimeout`] when the deadline expires
    /// - the upstream failure mapped to its [`ProxyError`] kind otherwise
    pub async fn answer_query(
        &self,
        query: &str,
        subject: Option<&SubjectRecord>,
    ) -> Result<String, ProxyError> {
        let query = validate_query(query)?;
        let prompt = build_prompt(query, subject);

        info!(
            has_subject = subject.is_some(),
            prompt_preview = %preview(&prompt, self.settings.preview_chars),
            "answering plant query"
        );

        let started = Instant::now();
        let outcome = timeout(self.settings.deadline, self.generator.generate(&prompt)).await;

        let generation = match outcome {
            Err(_) => {
                let err = ProxyError::UpstreamTimeout(self.settings.deadline);
                error!(code = err.code(), error = %err, "plant query failed");
                return Err(err);
            }
            Ok(Err(e)) => {
                if let Some(reason) = unexpected_finish(&e) {
                    warn!(finish_reason = reason.as_str(), "candidate stopped without content");
                }
                let err = ProxyError::from(e);
                error!(code = err.code(), error = %err, "plant query failed");
                return Err(err);
            }
            Ok(Ok(generation)) => generation,
        };

        if let Some(reason) = generation.finish_reason.as_ref().filter(|r| !r.is_expected()) {
            warn!(finish_reason = reason.as_str(), "answer may be partial or filtered");
        }

        info!(
            answer_len = generation.text.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "plant query answered"
        );
        Ok(generation.text)
    }

    /// Like [`Self::answer_query`], but when `subject` is `None`, a bearer
    /// token is present and a resolver is configured, first tries to find the
    /// subject in the catalog. Lookup failures and timeouts fall back to the
    /// general prompt.
    ///
    /// # Errors
    /// Same as [`Self::answer_query`]; enrichment never fails the request.
    pub async fn answer_with_enrichment(
        &self,
        query: &str,
        subject: Option<SubjectRecord>,
        bearer: Option<&str>,
    ) -> Result<String, ProxyError> {
        let query = validate_query(query)?;
        let subject = match subject {
            Some(s) => Some(s),
            None => self.resolve_subject(query, bearer).await,
        };
        self.answer_query(query, subject.as_ref()).await
    }

    async fn resolve_subject(&self, query: &str, bearer: Option<&str>) -> Option<SubjectRecord> {
        let resolver = self.resolver.as_ref()?;
        let bearer = bearer.map(str::trim).filter(|b| !b.is_empty())?;

        match timeout(self.settings.resolver_deadline, resolver.resolve(query, bearer)).await {
            Ok(found) => {
                debug!(resolved = found.is_some(), "subject enrichment finished");
                found
            }
            Err(_) => {
                warn!(
                    deadline_ms = self.settings.resolver_deadline.as_millis() as u64,
                    "subject enrichment timed out; using general prompt"
                );
                None
            }
        }
    }
}

/// Finish reason of a content-less candidate, when it is not `STOP`/`MAX_TOKENS`.
fn unexpected_finish(err: &AiLlmError) -> Option<&FinishReason> {
    match err {
        AiLlmError::Provider(ProviderError::MissingContent {
            finish_reason: Some(reason),
        }) if !reason.is_expected() => Some(reason),
        _ => None,
    }
}

/// Trims `query`; blank input is rejected before any upstream call.
fn validate_query(query: &str) -> Result<&str, ProxyError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        warn!("rejected empty query");
        return Err(ProxyError::InvalidInput("Query is required".to_string()));
    }
    Ok(trimmed)
}
