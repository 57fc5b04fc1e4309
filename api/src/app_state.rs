use std::sync::Arc;

use ai_llm_service::{GeminiConfig, GeminiService, HealthService, config_gemini_from};
use plant_qa::{PlantQa, ProxySettings, StoreSubjectResolver};
use plant_store::{PlantStore, PlantStoreConfig};
use tracing::{info, warn};

use crate::error_handler::AppResult;

/// Shared state for all HTTP handlers. Built once at startup and never
/// mutated; requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    /// Query pipeline (prompt building + upstream call + optional enrichment).
    pub qa: PlantQa,
    /// Upstream settings, kept for the health probe.
    pub llm_config: GeminiConfig,
    pub health: HealthService,
}

impl AppState {
    pub fn new(qa: PlantQa, llm_config: GeminiConfig, health: HealthService) -> Self {
        Self {
            qa,
            llm_config,
            health,
        }
    }

    /// Load shared state through `vars` (normally the process environment).
    ///
    /// A missing `GEMINI_API_KEY` is not fatal: the service starts and each
    /// query reports a configuration error. Catalog enrichment is enabled
    /// only when `SUPABASE_URL` and `SUPABASE_ANON_KEY` are both set.
    pub fn from_vars<F>(vars: &F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let llm_config = config_gemini_from(vars)?;
        if llm_config.api_key().is_none() {
            warn!("GEMINI_API_KEY is not set; queries will fail until it is configured");
        }
        info!(
            endpoint = %llm_config.endpoint,
            model = %llm_config.model,
            "Gemini client configured"
        );

        let generator = Arc::new(GeminiService::new(llm_config.clone())?);
        let settings = ProxySettings::from_vars(vars)?;
        let mut qa = PlantQa::new(generator, settings);

        match PlantStoreConfig::from_vars(vars)? {
            Some(store_cfg) => {
                let store = PlantStore::new(&store_cfg)?;
                qa = qa.with_resolver(Arc::new(StoreSubjectResolver::new(store)));
                info!(url = %store_cfg.url, "plant catalog enrichment enabled");
            }
            None => info!("plant catalog not configured; enrichment disabled"),
        }

        let health = HealthService::new(Some(5))?;
        Ok(Self::new(qa, llm_config, health))
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
    fn starts_without_any_secrets() {
        let state = AppState::from_vars(&vars(&[])).unwrap();
        assert!(state.llm_config.api_key().is_none());
    }

    #[test]
    fn invalid_settings_fail_startup() {
        assert!(AppState::from_vars(&vars(&[("LLM_TIMEOUT_SECS", "soon")])).is_err());
        assert!(AppState::from_vars(&vars(&[("PROXY_DEADLINE_SECS", "0")])).is_err());
        assert!(
            AppState::from_vars(&vars(&[
                ("SUPABASE_URL", "not-a-url"),
                ("SUPABASE_ANON_KEY", "anon"),
            ]))
            .is_err()
        );
    }
}
