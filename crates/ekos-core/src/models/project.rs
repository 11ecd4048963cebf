use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::wire;

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "Aktif")]
    Active,
    #[serde(rename = "Tamamlandı")]
    Completed,
    #[serde(rename = "Askıda")]
    Suspended,
    #[serde(rename = "İptal")]
    Cancelled,
}

/// Construction project owning reports and scaffold components.
///
/// `location` is free text; the form coordinator uses it for best-effort city
/// matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(rename = "proje_adi")]
    pub name: String,
    #[serde(rename = "proje_kodu", default)]
    pub code: Option<String>,
    #[serde(rename = "lokasyon", default)]
    pub location: Option<String>,
    #[serde(rename = "durum", default)]
    pub status: ProjectStatus,
    #[serde(rename = "baslangic_tarihi", default, with = "wire::lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "bitis_tarihi", default, with = "wire::lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "aciklama", default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /projeler`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectDraft {
    #[serde(rename = "proje_adi")]
    pub name: String,
    #[serde(rename = "proje_kodu")]
    pub code: Option<String>,
    #[serde(rename = "lokasyon")]
    pub location: Option<String>,
    #[serde(rename = "aciklama")]
    pub description: Option<String>,
}
