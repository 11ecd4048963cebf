//! Domain methods for the EKOS API client.
//!
//! One method per backend endpoint; request/response types come from
//! `ekos_core::models`. Endpoint paths keep the backend's Turkish naming
//! (`/raporlar`, `/dosyalar`, `/iskele-bilesenleri`).

use std::collections::HashMap;

use bytes::Bytes;

use ekos_core::constants::DEFAULT_RESULT_LIMIT;
use ekos_core::error::AppError;
use ekos_core::models::{
    Attachment, BulkDeleteResponse, Category, CategoryDraft, City, ComplianceStatus,
    DashboardStats, InspectionPeriod, LoginRequest, LoginResponse, Project, ProjectDraft,
    RegisterRequest, Report, ReportDraft, ScaffoldComponent, ScaffoldComponentDraft,
    StatusToggleResponse, UploadResponse, User, VerifyEmailRequest,
};

use crate::ApiClient;

/// Plain `{"message": ...}` confirmation body used by delete endpoints.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Server-side listing parameters for `GET /raporlar`. Project filtering is
/// not part of the wire contract; it is applied client-side over the result.
#[derive(Debug, Clone, Default)]
pub struct ReportListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub period: Option<InspectionPeriod>,
    pub compliance: Option<ComplianceStatus>,
    /// Result cap; the server applies 500 when unset and the client never
    /// second-guesses it.
    pub limit: Option<u32>,
}

impl ReportListQuery {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("arama", search.to_string()));
        }
        if let Some(category) = self.category.as_deref().filter(|s| !s.is_empty()) {
            params.push(("kategori", category.to_string()));
        }
        if let Some(period) = self.period {
            params.push(("periyot", period.as_str().to_string()));
        }
        if let Some(compliance) = self.compliance {
            params.push(("uygunluk", compliance.as_str().to_string()));
        }
        params.push((
            "limit",
            self.limit.unwrap_or(DEFAULT_RESULT_LIMIT).to_string(),
        ));
        params
    }
}

impl ApiClient {
    // --- Auth ---

    /// Log in and install the returned identity into the shared session.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let response: LoginResponse = self
            .post_json(
                "/auth/login",
                &LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        self.session()
            .establish(response.access_token, response.user.clone());
        Ok(response.user)
    }

    /// Drop the current identity.
    pub fn logout(&self) {
        self.session().clear();
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User, AppError> {
        self.post_json("/auth/register", request).await
    }

    pub async fn verify_email(&self, email: &str, code: &str) -> Result<MessageResponse, AppError> {
        self.post_json(
            "/auth/verify-email",
            &VerifyEmailRequest {
                email: email.to_string(),
                code: code.to_string(),
            },
        )
        .await
    }

    pub async fn resend_verification_code(&self, email: &str) -> Result<MessageResponse, AppError> {
        self.post_empty(&format!(
            "/auth/resend-code?email={}",
            urlencoding::encode(email)
        ))
        .await
    }

    /// Fetch the current profile and refresh the session's cached copy.
    pub async fn me(&self) -> Result<User, AppError> {
        let user: User = self.get("/auth/me", &[]).await?;
        self.session().update_user(user.clone());
        Ok(user)
    }

    // --- Reports ---

    pub async fn list_reports(&self, query: &ReportListQuery) -> Result<Vec<Report>, AppError> {
        self.get("/raporlar", &query.to_params()).await
    }

    pub async fn get_report(&self, report_id: &str) -> Result<Report, AppError> {
        self.get(&format!("/raporlar/{}", report_id), &[]).await
    }

    pub async fn create_report(&self, draft: &ReportDraft) -> Result<Report, AppError> {
        self.post_json("/raporlar", draft).await
    }

    /// Full-record update.
    pub async fn update_report(
        &self,
        report_id: &str,
        draft: &ReportDraft,
    ) -> Result<Report, AppError> {
        self.put_json(&format!("/raporlar/{}", report_id), draft)
            .await
    }

    pub async fn delete_report(&self, report_id: &str) -> Result<MessageResponse, AppError> {
        self.delete(&format!("/raporlar/{}", report_id)).await
    }

    /// Flip Aktif⇄Pasif server-side; the response carries the new value.
    pub async fn toggle_report_status(
        &self,
        report_id: &str,
    ) -> Result<StatusToggleResponse, AppError> {
        self.patch_empty(&format!("/raporlar/{}/durum", report_id))
            .await
    }

    pub async fn bulk_delete_reports(
        &self,
        report_ids: &[String],
    ) -> Result<BulkDeleteResponse, AppError> {
        self.post_json("/raporlar/bulk-delete", &report_ids).await
    }

    // --- Reference data ---

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.get("/kategoriler", &[]).await
    }

    pub async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, AppError> {
        self.post_json("/kategoriler", draft).await
    }

    pub async fn delete_category(&self, category_id: &str) -> Result<MessageResponse, AppError> {
        self.delete(&format!("/kategoriler/{}", category_id)).await
    }

    /// Legacy standalone category→sub-category map. Newer backends embed the
    /// lists in the category records; callers merge both (last write wins).
    pub async fn legacy_sub_category_map(
        &self,
    ) -> Result<HashMap<String, Vec<String>>, AppError> {
        self.get("/kategori-alt-kategoriler", &[]).await
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        self.get("/projeler", &[]).await
    }

    pub async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, AppError> {
        self.post_json("/projeler", draft).await
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<MessageResponse, AppError> {
        self.delete(&format!("/projeler/{}", project_id)).await
    }

    pub async fn list_cities(&self) -> Result<Vec<City>, AppError> {
        self.get("/sehirler", &[]).await
    }

    // --- Users (admin) ---

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.get("/users", &[]).await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<MessageResponse, AppError> {
        self.delete(&format!("/users/{}", user_id)).await
    }

    pub async fn bulk_delete_users(
        &self,
        user_ids: &[String],
    ) -> Result<BulkDeleteResponse, AppError> {
        self.post_json("/users/bulk-delete", &user_ids).await
    }

    // --- Dashboard ---

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AppError> {
        self.get("/dashboard/stats", &[]).await
    }

    // --- Attachments ---

    /// Upload one file against an existing report.
    pub async fn upload_attachment(
        &self,
        report_id: &str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, AppError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| AppError::Internal(format!("invalid content type: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);
        self.post_multipart(&format!("/upload/{}", report_id), form)
            .await
    }

    pub async fn list_attachments(&self, report_id: &str) -> Result<Vec<Attachment>, AppError> {
        self.get(&format!("/dosyalar/{}", report_id), &[]).await
    }

    pub async fn download_attachment(&self, attachment_id: &str) -> Result<Bytes, AppError> {
        self.get_bytes(&format!("/dosyalar/{}/indir", attachment_id))
            .await
    }

    pub async fn delete_attachment(
        &self,
        attachment_id: &str,
    ) -> Result<MessageResponse, AppError> {
        self.delete(&format!("/dosyalar/{}", attachment_id)).await
    }

    // --- Scaffold components ---

    pub async fn list_components(&self) -> Result<Vec<ScaffoldComponent>, AppError> {
        self.get("/iskele-bilesenleri", &[]).await
    }

    pub async fn create_component(
        &self,
        draft: &ScaffoldComponentDraft,
    ) -> Result<ScaffoldComponent, AppError> {
        self.post_json("/iskele-bilesenleri", draft).await
    }

    pub async fn bulk_delete_components(
        &self,
        component_ids: &[String],
    ) -> Result<BulkDeleteResponse, AppError> {
        self.post_json("/iskele-bilesenleri/bulk-delete", &component_ids)
            .await
    }

    // --- Excel passthrough (opaque bytes; workbook handling is external) ---

    pub async fn export_reports_excel(&self) -> Result<Bytes, AppError> {
        self.get_bytes("/excel/export").await
    }

    pub async fn export_components_excel(&self) -> Result<Bytes, AppError> {
        self.get_bytes("/iskele-bilesenleri/excel/export").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_skip_unset_filters_but_always_carry_limit() {
        let params = ReportListQuery::default().to_params();
        assert_eq!(params, vec![("limit", "500".to_string())]);
    }

    #[test]
    fn query_params_use_turkish_wire_names() {
        let query = ReportListQuery {
            search: Some("vinç".to_string()),
            category: Some("Vinç".to_string()),
            period: Some(InspectionPeriod::SixMonthly),
            compliance: Some(ComplianceStatus::NonCompliant),
            limit: Some(100),
        };
        let params = query.to_params();
        assert_eq!(
            params,
            vec![
                ("arama", "vinç".to_string()),
                ("kategori", "Vinç".to_string()),
                ("periyot", "6 Aylık".to_string()),
                ("uygunluk", "Uygun Değil".to_string()),
                ("limit", "100".to_string()),
            ]
        );
    }

    #[test]
    fn empty_search_is_not_sent() {
        let query = ReportListQuery {
            search: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(query.to_params(), vec![("limit", "500".to_string())]);
    }
}
