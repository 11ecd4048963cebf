use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::wire;

/// Inspection period of an equipment report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InspectionPeriod {
    #[serde(rename = "3 Aylık")]
    ThreeMonthly,
    #[serde(rename = "6 Aylık")]
    SixMonthly,
    #[serde(rename = "12 Aylık")]
    TwelveMonthly,
}

impl InspectionPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            InspectionPeriod::ThreeMonthly => "3 Aylık",
            InspectionPeriod::SixMonthly => "6 Aylık",
            InspectionPeriod::TwelveMonthly => "12 Aylık",
        }
    }
}

/// Compliance outcome of an inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceStatus {
    #[serde(rename = "Uygun")]
    Compliant,
    #[serde(rename = "Uygun Değil")]
    NonCompliant,
}

impl ComplianceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "Uygun",
            ComplianceStatus::NonCompliant => "Uygun Değil",
        }
    }
}

/// Operational status of a report. Reports are kept and flagged inactive
/// rather than hard-deleted until an explicit delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OperationalStatus {
    #[default]
    #[serde(rename = "Aktif")]
    Active,
    #[serde(rename = "Pasif")]
    Inactive,
}

impl OperationalStatus {
    pub fn toggled(self) -> Self {
        match self {
            OperationalStatus::Active => OperationalStatus::Inactive,
            OperationalStatus::Inactive => OperationalStatus::Active,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationalStatus::Active => "Aktif",
            OperationalStatus::Inactive => "Pasif",
        }
    }
}

/// A single equipment-inspection report as returned by `GET /raporlar`.
///
/// `report_no` is assigned by the server (PK2025-ANK001 style) and immutable.
/// `project_name`, `city_code`, and the creator fields are denormalised
/// display copies the server maintains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    #[serde(rename = "rapor_no")]
    pub report_no: String,
    #[serde(rename = "proje_id")]
    pub project_id: String,
    #[serde(rename = "proje_adi", default)]
    pub project_name: String,
    #[serde(rename = "sehir", default)]
    pub city: String,
    #[serde(rename = "sehir_kodu", default)]
    pub city_code: String,
    #[serde(rename = "ekipman_adi")]
    pub equipment_name: String,
    #[serde(rename = "kategori")]
    pub category: String,
    #[serde(rename = "alt_kategori", default)]
    pub sub_category: Option<String>,
    #[serde(rename = "firma")]
    pub firm: String,
    #[serde(rename = "lokasyon", default)]
    pub location: Option<String>,
    #[serde(rename = "marka_model", default)]
    pub brand_model: Option<String>,
    #[serde(rename = "seri_no", default)]
    pub serial_no: Option<String>,
    #[serde(
        rename = "periyot",
        default,
        deserialize_with = "wire::lenient_enum_opt"
    )]
    pub period: Option<InspectionPeriod>,
    #[serde(rename = "gecerlilik_tarihi", default, with = "wire::lenient_date")]
    pub valid_until: Option<NaiveDate>,
    #[serde(rename = "aciklama", default)]
    pub notes: Option<String>,
    #[serde(
        rename = "uygunluk",
        default,
        deserialize_with = "wire::lenient_enum_opt"
    )]
    pub compliance: Option<ComplianceStatus>,
    #[serde(rename = "durum", default)]
    pub status: OperationalStatus,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_by_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /raporlar` and `PUT /raporlar/{id}` (full record on
/// update; the server fills in report number, city code, and creator).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportDraft {
    #[serde(rename = "proje_id")]
    pub project_id: String,
    #[serde(rename = "sehir")]
    pub city: String,
    #[serde(rename = "ekipman_adi")]
    pub equipment_name: String,
    #[serde(rename = "kategori")]
    pub category: String,
    #[serde(rename = "alt_kategori")]
    pub sub_category: Option<String>,
    #[serde(rename = "firma")]
    pub firm: String,
    #[serde(rename = "lokasyon")]
    pub location: Option<String>,
    #[serde(rename = "marka_model")]
    pub brand_model: Option<String>,
    #[serde(rename = "seri_no")]
    pub serial_no: Option<String>,
    #[serde(rename = "periyot")]
    pub period: Option<InspectionPeriod>,
    #[serde(rename = "gecerlilik_tarihi", with = "wire::lenient_date")]
    pub valid_until: Option<NaiveDate>,
    #[serde(rename = "aciklama")]
    pub notes: Option<String>,
    #[serde(rename = "uygunluk")]
    pub compliance: Option<ComplianceStatus>,
}

impl Report {
    /// Draft carrying this report's editable fields, for the full-record PUT.
    pub fn to_draft(&self) -> ReportDraft {
        ReportDraft {
            project_id: self.project_id.clone(),
            city: self.city.clone(),
            equipment_name: self.equipment_name.clone(),
            category: self.category.clone(),
            sub_category: self.sub_category.clone(),
            firm: self.firm.clone(),
            location: self.location.clone(),
            brand_model: self.brand_model.clone(),
            serial_no: self.serial_no.clone(),
            period: self.period,
            valid_until: self.valid_until,
            notes: self.notes.clone(),
            compliance: self.compliance,
        }
    }
}

/// Response of `PATCH /raporlar/{id}/durum`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusToggleResponse {
    pub message: String,
    #[serde(rename = "durum")]
    pub status: OperationalStatus,
}

/// Response of the bulk-delete endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkDeleteResponse {
    pub message: String,
    #[serde(default)]
    pub deleted_count: u64,
}
