use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File attachment metadata as returned by `GET /dosyalar/{rapor_id}`.
///
/// Content bytes are never part of this record; they are fetched on demand
/// through `GET /dosyalar/{id}/indir`. The declared content type is kept for
/// display only — preview dispatch goes by filename extension because the
/// backend does not reliably echo a type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    #[serde(rename = "rapor_id")]
    pub report_id: String,
    #[serde(rename = "dosya_adi")]
    pub file_name: String,
    #[serde(rename = "dosya_tipi", default)]
    pub content_type: Option<String>,
    #[serde(rename = "dosya_boyutu")]
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// Response of `POST /upload/{rapor_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    #[serde(default)]
    pub file_id: Option<String>,
}
