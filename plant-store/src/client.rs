//! PostgREST client for the `plants` table.
//!
//! Endpoint used:
//!   * GET {url}/rest/v1/plants?select=…&or=(name.ilike.*term*,…)&order=name.asc&limit=1

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::{
    config::PlantStoreConfig,
    errors::PlantStoreResult,
    terms::name_filter,
    types::{PLANT_COLUMNS, PlantRecord},
};

/// Read-only plant catalog client.
#[derive(Clone)]
pub struct PlantStore {
    http: Client,
    url_plants: String,
    api_key: String,
}

impl PlantStore {
    /// Builds a client with the configured timeout.
    ///
    /// # Errors
    /// Returns a network error if the HTTP client cannot be built.
    pub fn new(cfg: &PlantStoreConfig) -> PlantStoreResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()?;
        debug!("Creating PlantStore with url={}", cfg.url);
        Ok(Self {
            http,
            url_plants: format!("{}/rest/v1/plants", cfg.url),
            api_key: cfg.api_key.clone(),
        })
    }

    /// Returns the first plant (by name) whose name contains any of `terms`,
    /// case-insensitively. One request; `Ok(None)` for no terms or no match.
    ///
    /// `bearer` is the caller's access token; without one the anon key is
    /// used, as PostgREST expects.
    pub async fn find_first_by_name(
        &self,
        terms: &[String],
        bearer: Option<&str>,
    ) -> PlantStoreResult<Option<PlantRecord>> {
        let Some(filter) = name_filter(terms) else {
            return Ok(None);
        };
        debug!(terms = ?terms, "PlantStore find_first_by_name: {}", self.url_plants);

        let rows: Vec<PlantRecord> = self
            .http
            .get(&self.url_plants)
            .query(&[
                ("select", PLANT_COLUMNS),
                ("or", filter.as_str()),
                ("order", "name.asc"),
                ("limit", "1"),
            ])
            .header("apikey", &self.api_key)
            .header("Accept", "application/json")
            .bearer_auth(bearer.unwrap_or(&self.api_key))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(rows.into_iter().next())
    }
}
