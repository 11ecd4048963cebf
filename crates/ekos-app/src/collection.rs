//! Report collection manager.
//!
//! Holds the backing set returned by the last successful listing fetch, the
//! active filter, a multi-select set for bulk actions, and a page cursor.
//! State transitions happen by whole-value replacement: a fetch builds the
//! complete new list before it replaces the old one, and an optimistic status
//! toggle swaps the affected record in and out as a value.
//!
//! Selection policy: changing the filter never touches the selection (ids
//! filtered out of view stay selected internally but are non-actionable);
//! only a re-fetch prunes ids that no longer exist in the backing set.

use std::collections::HashSet;

use ekos_api_client::{ApiClient, MessageResponse, ReportListQuery};
use ekos_core::constants::CATALOG_PAGE_SIZE;
use ekos_core::error::AppError;
use ekos_core::models::{
    BulkDeleteResponse, ComplianceStatus, InspectionPeriod, Report, StatusToggleResponse,
};

use crate::pagination::Pagination;

/// Listing filter. Search, category, period, and compliance go to the server;
/// period is additionally applied client-side (idempotent), and project
/// scoping is client-side only.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub search: String,
    pub category: Option<String>,
    pub period: Option<InspectionPeriod>,
    pub compliance: Option<ComplianceStatus>,
    pub project_id: Option<String>,
    pub limit: Option<u32>,
}

impl ReportFilter {
    fn to_query(&self) -> ReportListQuery {
        ReportListQuery {
            search: if self.search.is_empty() {
                None
            } else {
                Some(self.search.clone())
            },
            category: self.category.clone(),
            period: self.period,
            compliance: self.compliance,
            limit: self.limit,
        }
    }
}

pub struct ReportCollection {
    client: ApiClient,
    filter: ReportFilter,
    reports: Vec<Report>,
    selected: HashSet<String>,
    pagination: Pagination,
}

impl ReportCollection {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            filter: ReportFilter::default(),
            reports: Vec::new(),
            selected: HashSet::new(),
            pagination: Pagination::new(CATALOG_PAGE_SIZE),
        }
    }

    pub fn filter(&self) -> &ReportFilter {
        &self.filter
    }

    /// Change the filter without fetching. Selection is intentionally kept.
    pub fn set_filter(&mut self, filter: ReportFilter) {
        self.filter = filter;
        self.pagination.reclamp(self.visible().len());
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    /// Fetch the listing for the current filter and replace the backing set.
    ///
    /// On success the selection is pruned to ids present in the new set and
    /// the page cursor is re-clamped. On failure the previous state is kept
    /// untouched; the client has already retried transient failures.
    pub async fn refresh(&mut self) -> Result<(), AppError> {
        let reports = self.client.list_reports(&self.filter.to_query()).await?;
        tracing::debug!(count = reports.len(), "report listing replaced");
        self.reports = reports;

        let known: HashSet<&str> = self.reports.iter().map(|r| r.id.as_str()).collect();
        self.selected.retain(|id| known.contains(id.as_str()));
        self.pagination.reclamp(self.visible().len());
        Ok(())
    }

    /// The backing set as returned by the server, unfiltered.
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    fn matches_client_side(&self, report: &Report) -> bool {
        if let Some(period) = self.filter.period {
            if report.period != Some(period) {
                return false;
            }
        }
        if let Some(project_id) = self.filter.project_id.as_deref() {
            if report.project_id != project_id {
                return false;
            }
        }
        true
    }

    /// The rendered set: the backend-returned rows intersected with the
    /// client-side period and project predicates.
    pub fn visible(&self) -> Vec<&Report> {
        self.reports
            .iter()
            .filter(|r| self.matches_client_side(r))
            .collect()
    }

    /// Current page of the visible set.
    pub fn page_items(&self) -> Vec<&Report> {
        let visible = self.visible();
        self.pagination.slice(&visible).to_vec()
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn set_page(&mut self, page: usize) {
        let count = self.visible().len();
        self.pagination.set_page(page, count);
    }

    pub fn next_page(&mut self) {
        let count = self.visible().len();
        self.pagination.next(count);
    }

    pub fn previous_page(&mut self) {
        let count = self.visible().len();
        self.pagination.previous(count);
    }

    // --- Selection ---

    pub fn is_selected(&self, report_id: &str) -> bool {
        self.selected.contains(report_id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// The full selected set, sorted for deterministic request payloads.
    pub fn selected_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.selected.iter().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// Selected ids that are part of the currently visible set; stale
    /// selections are retained but non-actionable.
    pub fn actionable_ids(&self) -> Vec<String> {
        let visible: HashSet<&str> = self.visible().iter().map(|r| r.id.as_str()).collect();
        let mut ids: Vec<String> = self
            .selected
            .iter()
            .filter(|id| visible.contains(id.as_str()))
            .cloned()
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn toggle_select(&mut self, report_id: &str) {
        if !self.selected.remove(report_id) {
            self.selected.insert(report_id.to_string());
        }
    }

    /// Toggle between an empty selection and exactly the current visible
    /// (filtered) set — never the unfiltered backing set. Re-evaluated
    /// against the visible set each invocation.
    pub fn toggle_select_all(&mut self) {
        let visible: HashSet<String> =
            self.visible().iter().map(|r| r.id.clone()).collect();
        let all_visible_selected =
            !visible.is_empty() && visible.iter().all(|id| self.selected.contains(id));

        if all_visible_selected {
            self.selected.clear();
        } else {
            self.selected = visible;
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    // --- Mutations ---

    fn require_edit(&self) -> Result<(), AppError> {
        if self.client.session().can_edit() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Bu işlem için yetkiniz yok".to_string(),
            ))
        }
    }

    /// Delete every selected report through the batch endpoint.
    ///
    /// Success clears the selection and re-fetches; failure leaves the
    /// selection untouched — no partial client-side removal is assumed.
    pub async fn bulk_delete(&mut self) -> Result<BulkDeleteResponse, AppError> {
        self.require_edit()?;
        if self.selected.is_empty() {
            return Err(AppError::Validation(
                "Lütfen silmek için en az bir rapor seçin".to_string(),
            ));
        }

        let ids = self.selected_ids();
        let response = self.client.bulk_delete_reports(&ids).await?;
        self.selected.clear();
        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, "re-fetch after bulk delete failed");
        }
        Ok(response)
    }

    /// Delete a single report, then re-fetch.
    pub async fn delete_report(&mut self, report_id: &str) -> Result<MessageResponse, AppError> {
        self.require_edit()?;
        let response = self.client.delete_report(report_id).await?;
        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, "re-fetch after delete failed");
        }
        Ok(response)
    }

    /// Optimistically flip a report's operational status.
    ///
    /// The in-memory record flips before the request goes out; on failure the
    /// exact prior value is restored (not a hard-coded default, so toggling
    /// an already-inactive report rolls back to inactive).
    pub async fn toggle_status(
        &mut self,
        report_id: &str,
    ) -> Result<StatusToggleResponse, AppError> {
        self.require_edit()?;
        let index = self
            .reports
            .iter()
            .position(|r| r.id == report_id)
            .ok_or_else(|| AppError::NotFound("Rapor bulunamadı".to_string()))?;

        let snapshot = self.reports[index].status;
        self.replace_status(index, snapshot.toggled());

        match self.client.toggle_report_status(report_id).await {
            Ok(response) => {
                // Last confirmation from the backend wins over the guess.
                self.replace_status(index, response.status);
                Ok(response)
            }
            Err(err) => {
                tracing::debug!(report_id, "status toggle failed, rolling back");
                self.replace_status(index, snapshot);
                Err(err)
            }
        }
    }

    fn replace_status(&mut self, index: usize, status: ekos_core::models::OperationalStatus) {
        let mut report = self.reports[index].clone();
        report.status = status;
        self.reports[index] = report;
    }
}
