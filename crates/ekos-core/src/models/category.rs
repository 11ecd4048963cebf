use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Equipment category with its ordered sub-category names.
///
/// Sub-category order is meaningful for display; names need not be unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(rename = "isim")]
    pub name: String,
    #[serde(rename = "alt_kategoriler", default)]
    pub sub_categories: Vec<String>,
    #[serde(rename = "aciklama", default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /kategoriler`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryDraft {
    #[serde(rename = "isim")]
    pub name: String,
    #[serde(rename = "alt_kategoriler")]
    pub sub_categories: Vec<String>,
    #[serde(rename = "aciklama")]
    pub description: Option<String>,
}
