use serde::{Deserialize, Serialize};

/// One (category, count) pair of the dashboard's category distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(rename = "kategori")]
    pub category: String,
    pub count: u64,
}

/// Summary object from `GET /dashboard/stats`.
///
/// The expiry-window fields are optional: older backend generations compute
/// only the 30/7-day windows, and the client derives its own windows from the
/// report list anyway (the stats values are display hints).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(rename = "total_raporlar")]
    pub total_reports: u64,
    #[serde(rename = "monthly_raporlar")]
    pub monthly_reports: u64,
    #[serde(rename = "uygun_count")]
    pub compliant_count: u64,
    #[serde(rename = "uygun_degil_count")]
    pub non_compliant_count: u64,
    #[serde(default)]
    pub expiring_30_days: u64,
    #[serde(default)]
    pub expiring_7_days: u64,
    #[serde(default)]
    pub expired_count: u64,
    #[serde(rename = "kategori_dagilim", default)]
    pub category_distribution: Vec<CategoryCount>,
}
