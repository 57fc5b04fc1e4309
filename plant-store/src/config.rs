//! Store settings resolved once at startup.

use std::fmt;

use crate::errors::{PlantStoreError, PlantStoreResult};

/// Connection settings for the plant catalog REST API.
#[derive(Clone)]
pub struct PlantStoreConfig {
    /// Project URL, e.g. `https://xyz.supabase.co` (without `/rest/v1`).
    pub url: String,
    /// Public (anon) access key sent as `apikey`.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl PlantStoreConfig {
    /// Reads `SUPABASE_URL`, `SUPABASE_ANON_KEY` and optional
    /// `SUPABASE_TIMEOUT_SECS` through `vars`.
    ///
    /// Returns `Ok(None)` when URL or key is missing: the store is optional
    /// and its absence simply disables enrichment.
    ///
    /// # Errors
    /// [`PlantStoreError::Config`] for a non-http(s) URL or a bad timeout.
    pub fn from_vars<F>(vars: &F) -> PlantStoreResult<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| vars(name).filter(|v| !v.trim().is_empty());

        let (Some(url), Some(api_key)) = (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) else {
            return Ok(None);
        };

        let url = url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(PlantStoreError::Config(
                "SUPABASE_URL must start with http:// or https://".into(),
            ));
        }

        let timeout_secs = match get("SUPABASE_TIMEOUT_SECS") {
            Some(v) => v.trim().parse::<u64>().map_err(|_| {
                PlantStoreError::Config("SUPABASE_TIMEOUT_SECS must be a whole number".into())
            })?,
            None => 5,
        };

        Ok(Some(Self {
            url,
            api_key: api_key.trim().to_string(),
            timeout_secs,
        }))
    }
}

impl fmt::Debug for PlantStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlantStoreConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
