//! The plant a question is about.

use plant_store::PlantRecord;

/// Structured plant data used to ground an answer.
///
/// Supplied by the caller (or resolved from the catalog) per request and
/// only ever read: the proxy interpolates it into the prompt and drops it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectRecord {
    pub name: String,
    pub scientific_name: String,
    pub description: Option<String>,
    pub uses: Option<String>,
    pub usage_instructions: Option<String>,
}

impl From<PlantRecord> for SubjectRecord {
    fn from(p: PlantRecord) -> Self {
        Self {
            name: p.name,
            scientific_name: p.scientific_name,
            description: p.description,
            uses: p.medicinal_uses,
            usage_instructions: p.how_to_use,
        }
    }
}
