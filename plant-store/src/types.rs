//! Row model of the `plants` table.

use serde::{Deserialize, Serialize};

/// Columns selected from `plants`; catalog-only columns (image, category,
/// timestamps) are not fetched.
pub const PLANT_COLUMNS: &str = "id,name,scientific_name,description,medicinal_uses,how_to_use";

/// A plant as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantRecord {
    pub id: i64,
    pub name: String,
    pub scientific_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub medicinal_uses: Option<String>,
    #[serde(default)]
    pub how_to_use: Option<String>,
}
