//! Read-only access to the medicinal plant catalog.
//!
//! Only what the Q&A proxy needs: find one plant whose name matches words of
//! a free-text question.

pub mod client;
pub mod config;
pub mod errors;
pub mod terms;
pub mod types;

pub use client::PlantStore;
pub use config::PlantStoreConfig;
pub use errors::{PlantStoreError, PlantStoreResult};
pub use terms::{name_filter, search_terms};
pub use types::PlantRecord;
