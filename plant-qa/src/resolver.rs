//! Optional subject enrichment from the plant catalog.

use async_trait::async_trait;
use plant_store::{PlantStore, search_terms};
use tracing::{debug, warn};

use crate::subject::SubjectRecord;

/// Finds the plant a free-text question is about.
///
/// Implementations must not fail: any lookup problem resolves to `None` and
/// the query proceeds with the general prompt.
#[async_trait]
pub trait SubjectResolver: Send + Sync {
    async fn resolve(&self, query: &str, bearer: &str) -> Option<SubjectRecord>;
}

/// [`SubjectResolver`] backed by the catalog's REST API, queried with the
/// caller's own bearer token.
pub struct StoreSubjectResolver {
    store: PlantStore,
}

impl StoreSubjectResolver {
    pub fn new(store: PlantStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SubjectResolver for StoreSubjectResolver {
    async fn resolve(&self, query: &str, bearer: &str) -> Option<SubjectRecord> {
        let terms = search_terms(query);
        if terms.is_empty() {
            debug!("no searchable words in query; skipping enrichment");
            return None;
        }

        match self.store.find_first_by_name(&terms, Some(bearer)).await {
            Ok(Some(plant)) => {
                debug!(plant_id = plant.id, plant = %plant.name, "query matched catalog plant");
                Some(plant.into())
            }
            Ok(None) => {
                debug!(terms = ?terms, "no catalog plant matched");
                None
            }
            Err(e) => {
                warn!(error = %e, "plant lookup failed; continuing without subject");
                None
            }
        }
    }
}
