use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::report::ComplianceStatus;
use super::wire;

/// Fixed inspection period of scaffold components, as serialized to the wire.
pub const COMPONENT_PERIOD: &str = "6 Aylık";

/// Scaffold component record from `GET /iskele-bilesenleri`.
///
/// Unlike reports, components have no detachable attachments: up to three
/// preview images are embedded as data URIs at creation and never change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldComponent {
    pub id: String,
    #[serde(rename = "proje_id")]
    pub project_id: String,
    #[serde(rename = "bileşen_adi")]
    pub name: String,
    #[serde(rename = "malzeme_kodu")]
    pub material_code: String,
    #[serde(rename = "bileşen_adedi")]
    pub quantity: u32,
    #[serde(rename = "firma_adi")]
    pub firm: String,
    #[serde(rename = "periyot", default = "default_period")]
    pub period: String,
    #[serde(rename = "gecerlilik_tarihi", default, with = "wire::lenient_date")]
    pub valid_until: Option<NaiveDate>,
    #[serde(
        rename = "uygunluk",
        default,
        deserialize_with = "wire::lenient_enum_opt"
    )]
    pub compliance: Option<ComplianceStatus>,
    #[serde(rename = "gorseller", default)]
    pub images: Vec<String>,
    #[serde(rename = "aciklama", default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn default_period() -> String {
    COMPONENT_PERIOD.to_string()
}

/// Payload for `POST /iskele-bilesenleri`.
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldComponentDraft {
    #[serde(rename = "proje_id")]
    pub project_id: String,
    #[serde(rename = "bileşen_adi")]
    pub name: String,
    #[serde(rename = "malzeme_kodu")]
    pub material_code: String,
    #[serde(rename = "bileşen_adedi")]
    pub quantity: u32,
    #[serde(rename = "firma_adi")]
    pub firm: String,
    #[serde(rename = "periyot")]
    pub period: String,
    #[serde(rename = "gecerlilik_tarihi", with = "wire::lenient_date")]
    pub valid_until: Option<NaiveDate>,
    #[serde(rename = "uygunluk")]
    pub compliance: ComplianceStatus,
    #[serde(rename = "gorseller")]
    pub images: Vec<String>,
    #[serde(rename = "aciklama")]
    pub notes: Option<String>,
}

impl Default for ScaffoldComponentDraft {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            name: String::new(),
            material_code: String::new(),
            quantity: 1,
            firm: String::new(),
            period: COMPONENT_PERIOD.to_string(),
            valid_until: None,
            compliance: ComplianceStatus::Compliant,
            images: Vec::new(),
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_keep_turkish_characters() {
        let component: ScaffoldComponent = serde_json::from_str(
            r#"{
                "id": "c-1",
                "proje_id": "p-1",
                "bileşen_adi": "Çelik Direk",
                "malzeme_kodu": "ISK-001",
                "bileşen_adedi": 40,
                "firma_adi": "ABC İnşaat",
                "uygunluk": "Uygun",
                "created_at": "2025-06-01T10:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(component.name, "Çelik Direk");
        assert_eq!(component.quantity, 40);
        assert_eq!(component.period, COMPONENT_PERIOD);
        assert!(component.images.is_empty());
    }

    #[test]
    fn draft_defaults_to_six_month_period() {
        let draft = ScaffoldComponentDraft::default();
        assert_eq!(draft.period, "6 Aylık");
        assert_eq!(draft.quantity, 1);
        assert_eq!(draft.compliance, ComplianceStatus::Compliant);
    }
}
