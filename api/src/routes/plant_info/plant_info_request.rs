use plant_qa::SubjectRecord;
use serde::{Deserialize, Serialize};

/// Body of `POST /gemini-plant-info`.
#[derive(Debug, Deserialize)]
pub struct PlantInfoRequest {
    /// Free-text question. Missing and `null` are treated as empty.
    #[serde(default)]
    pub query: Option<String>,
    /// Plant the question is about, if the caller already has it.
    #[serde(default, rename = "plantInfo")]
    pub plant_info: Option<PlantInfo>,
}

/// Catalog-shaped plant record. Unknown fields (ids, image urls, ...) are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct PlantInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scientific_name: String,
    pub description: Option<String>,
    pub medicinal_uses: Option<String>,
    pub how_to_use: Option<String>,
}

impl From<PlantInfo> for SubjectRecord {
    fn from(p: PlantInfo) -> Self {
        Self {
            name: p.name,
            scientific_name: p.scientific_name,
            description: p.description,
            uses: p.medicinal_uses,
            usage_instructions: p.how_to_use,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlantInfoResponse {
    /// Generated answer text, returned verbatim.
    pub content: String,
}
