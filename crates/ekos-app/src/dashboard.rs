//! Dashboard aggregation. Read-side only: consumes the stats endpoint and
//! derives display values; the expiry windows are computed client-side from a
//! freshly fetched report list, independent of the stats object.

use chrono::{Duration, NaiveDate};

use ekos_api_client::{ApiClient, ReportListQuery};
use ekos_core::error::AppError;
use ekos_core::models::{DashboardStats, Report};

/// One category's share of the distribution, with its bar width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryShare {
    pub category: String,
    pub count: u64,
    pub percentage: u8,
}

/// Fetched stats plus derived display values.
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    stats: DashboardStats,
}

impl DashboardSummary {
    pub async fn load(client: &ApiClient) -> Result<Self, AppError> {
        let stats = client.dashboard_stats().await?;
        Ok(Self { stats })
    }

    pub fn from_stats(stats: DashboardStats) -> Self {
        Self { stats }
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    /// Compliant share of all reports, rounded to whole percent.
    pub fn compliance_percentage(&self) -> u8 {
        percentage(self.stats.compliant_count, self.stats.total_reports)
    }

    /// Category distribution with bar widths relative to the total.
    pub fn category_shares(&self) -> Vec<CategoryShare> {
        self.stats
            .category_distribution
            .iter()
            .map(|entry| CategoryShare {
                category: entry.category.clone(),
                count: entry.count,
                percentage: percentage(entry.count, self.stats.total_reports),
            })
            .collect()
    }
}

fn percentage(part: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u8
}

/// Reports bucketed by validity window against a reference date.
#[derive(Debug, Default)]
pub struct ExpiryOverview {
    /// Valid today but expiring within the next 30 days (inclusive).
    pub expiring: Vec<Report>,
    /// Validity date strictly before the reference date.
    pub expired: Vec<Report>,
}

/// Classify a report list by expiry. Reports without a validity date fall
/// into neither bucket. Both counts derive from the same list and date, which
/// keeps them consistent with each other regardless of the stats endpoint.
pub fn classify_expiry(reports: Vec<Report>, today: NaiveDate) -> ExpiryOverview {
    let horizon = today + Duration::days(30);
    let mut overview = ExpiryOverview::default();
    for report in reports {
        let Some(valid_until) = report.valid_until else {
            continue;
        };
        if valid_until < today {
            overview.expired.push(report);
        } else if valid_until <= horizon {
            overview.expiring.push(report);
        }
    }
    overview
}

/// Fetch the full report list and classify it. Used by the dashboard
/// drill-down, which hands the matching subset to the collection view.
pub async fn load_expiry_overview(
    client: &ApiClient,
    today: NaiveDate,
) -> Result<ExpiryOverview, AppError> {
    let reports = client.list_reports(&ReportListQuery::default()).await?;
    Ok(classify_expiry(reports, today))
}
