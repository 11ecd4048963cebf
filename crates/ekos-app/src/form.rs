//! Report form coordinator.
//!
//! Builds or edits a single report record. Dependent fields are derived from
//! the reference cache on every relevant change: selecting a project attempts
//! a best-effort city match from its location text, and selecting a category
//! always resets the chosen sub-category and repopulates its options.
//!
//! Files are staged locally in two slots (images and other documents) with
//! per-file admission; after the record itself is durably created or updated,
//! staged files are uploaded one at a time so a failure can name the exact
//! file. A failed upload never rolls back the record and never stops the
//! remaining files.

use std::sync::Arc;

use ekos_api_client::ApiClient;
use ekos_core::error::AppError;
use ekos_core::models::{Report, ReportDraft};
use ekos_core::validation::{admit_file, mime_type_for, FileSlot};

use crate::reference::ReferenceCache;

/// A file staged for upload after submission.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl StagedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// A per-file failure, either at admission time or during upload.
#[derive(Debug)]
pub struct FailedUpload {
    pub file_name: String,
    pub error: AppError,
}

/// Result of a submission: the durable record plus per-file upload outcomes.
#[derive(Debug)]
pub struct SubmitOutcome {
    pub report: Report,
    pub uploaded: Vec<String>,
    pub failed: Vec<FailedUpload>,
}

pub struct ReportForm {
    client: ApiClient,
    cache: Arc<ReferenceCache>,
    existing_id: Option<String>,
    draft: ReportDraft,
    staged_images: Vec<StagedFile>,
    staged_documents: Vec<StagedFile>,
}

impl ReportForm {
    /// Open a form against an already-loaded reference cache. `existing`
    /// switches the form into edit mode (submission becomes a full-record
    /// PUT against that id).
    pub fn with_cache(
        client: ApiClient,
        cache: Arc<ReferenceCache>,
        existing: Option<&Report>,
    ) -> Self {
        Self {
            client,
            cache,
            existing_id: existing.map(|r| r.id.clone()),
            draft: existing.map(Report::to_draft).unwrap_or_default(),
            staged_images: Vec::new(),
            staged_documents: Vec::new(),
        }
    }

    /// Open a form, loading the reference lists concurrently first.
    pub async fn open(client: ApiClient, existing: Option<&Report>) -> Result<Self, AppError> {
        let cache = Arc::new(ReferenceCache::load(&client).await?);
        Ok(Self::with_cache(client, cache, existing))
    }

    pub fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    pub fn draft(&self) -> &ReportDraft {
        &self.draft
    }

    pub fn is_edit(&self) -> bool {
        self.existing_id.is_some()
    }

    // --- Field setters with derivations ---

    /// Select the owning project. When the project carries a location text
    /// that matches a known city name (containment either way, first match
    /// wins), the city auto-populates; no match leaves the field as it was.
    pub fn set_project(&mut self, project_id: &str) {
        self.draft.project_id = project_id.to_string();
        let matched = self
            .cache
            .project(project_id)
            .and_then(|p| p.location.as_deref())
            .and_then(|location| self.cache.match_city(location))
            .map(|city| city.name.clone());
        if let Some(city) = matched {
            self.draft.city = city;
        }
    }

    /// Select the category. The chosen sub-category is always reset; the new
    /// options come from the cache at call time.
    pub fn set_category(&mut self, category: &str) {
        self.draft.category = category.to_string();
        self.draft.sub_category = None;
    }

    /// Options for the sub-category control under the current category.
    pub fn sub_category_options(&self) -> &[String] {
        self.cache.sub_categories_for(&self.draft.category)
    }

    /// The sub-category control is disabled when the category has no mapping.
    pub fn sub_category_enabled(&self) -> bool {
        !self.sub_category_options().is_empty()
    }

    /// Choose a sub-category from the current options.
    pub fn set_sub_category(&mut self, sub_category: Option<String>) -> Result<(), AppError> {
        if let Some(name) = sub_category.as_deref() {
            if !self.sub_category_options().iter().any(|s| s == name) {
                return Err(AppError::Validation(format!(
                    "Alt kategori '{}' seçili kategoriye ait değil",
                    name
                )));
            }
        }
        self.draft.sub_category = sub_category;
        Ok(())
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.draft.city = city.into();
    }

    /// Remaining fields have no derivation rules; edit the draft directly.
    pub fn draft_mut(&mut self) -> &mut ReportDraft {
        &mut self.draft
    }

    // --- Staged files ---

    pub fn staged_images(&self) -> &[StagedFile] {
        &self.staged_images
    }

    pub fn staged_documents(&self) -> &[StagedFile] {
        &self.staged_documents
    }

    /// Stage a file into the image slot (jpeg/png). Rejection applies to this
    /// file only.
    pub fn stage_image(&mut self, file: StagedFile) -> Result<(), AppError> {
        admit_file(FileSlot::Image, &file.file_name, file.bytes.len() as u64)?;
        self.staged_images.push(file);
        Ok(())
    }

    /// Stage a file into the "other files" slot (pdf/doc/docx).
    pub fn stage_document(&mut self, file: StagedFile) -> Result<(), AppError> {
        admit_file(FileSlot::Document, &file.file_name, file.bytes.len() as u64)?;
        self.staged_documents.push(file);
        Ok(())
    }

    /// Stage a batch, returning the rejected files; admitted ones are kept.
    pub fn stage_batch(&mut self, slot: FileSlot, files: Vec<StagedFile>) -> Vec<FailedUpload> {
        let mut rejected = Vec::new();
        for file in files {
            let result = match slot {
                FileSlot::Image => self.stage_image(file.clone()),
                _ => self.stage_document(file.clone()),
            };
            if let Err(error) = result {
                rejected.push(FailedUpload {
                    file_name: file.file_name,
                    error,
                });
            }
        }
        rejected
    }

    pub fn remove_staged_image(&mut self, index: usize) {
        if index < self.staged_images.len() {
            self.staged_images.remove(index);
        }
    }

    pub fn remove_staged_document(&mut self, index: usize) {
        if index < self.staged_documents.len() {
            self.staged_documents.remove(index);
        }
    }

    // --- Validation & submission ---

    /// Local required-field check; runs before any network call.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut missing: Vec<&str> = Vec::new();
        if self.draft.project_id.trim().is_empty() {
            missing.push("Proje");
        }
        if self.draft.city.trim().is_empty() {
            missing.push("Şehir");
        }
        if self.draft.equipment_name.trim().is_empty() {
            missing.push("Ekipman Adı");
        }
        if self.draft.category.trim().is_empty() {
            missing.push("Kategori");
        }
        if self.draft.firm.trim().is_empty() {
            missing.push("Firma");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Zorunlu alanlar eksik: {}",
                missing.join(", ")
            )))
        }
    }

    /// Create or update the record, then push staged files sequentially.
    ///
    /// File N+1 does not start before file N's outcome is known, so each
    /// failure names its file. Failures are collected into the outcome; they
    /// neither abort the remaining uploads nor roll back the record.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, AppError> {
        if !self.client.session().can_edit() {
            return Err(AppError::Forbidden(
                "Rapor oluşturma yetkiniz yok".to_string(),
            ));
        }
        self.validate()?;

        let report = match self.existing_id.as_deref() {
            Some(id) => self.client.update_report(id, &self.draft).await?,
            None => {
                let created = self.client.create_report(&self.draft).await?;
                // The server-assigned id is what the uploads attach to.
                self.existing_id = Some(created.id.clone());
                created
            }
        };

        let staged: Vec<StagedFile> = self
            .staged_images
            .drain(..)
            .chain(self.staged_documents.drain(..))
            .collect();

        let mut uploaded = Vec::new();
        let mut failed = Vec::new();
        for file in staged {
            let content_type = match mime_type_for(&file.file_name) {
                Some(ct) => ct,
                None => {
                    failed.push(FailedUpload {
                        error: AppError::UnsupportedFileType(file.file_name.clone()),
                        file_name: file.file_name,
                    });
                    continue;
                }
            };
            match self
                .client
                .upload_attachment(&report.id, &file.file_name, content_type, file.bytes)
                .await
            {
                Ok(_) => uploaded.push(file.file_name),
                Err(error) => {
                    tracing::warn!(file = %file.file_name, error = %error, "staged upload failed");
                    failed.push(FailedUpload {
                        file_name: file.file_name,
                        error,
                    });
                }
            }
        }

        Ok(SubmitOutcome {
            report,
            uploaded,
            failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ekos_api_client::Session;
    use ekos_core::models::{Category, City, Project, ProjectStatus};
    use ekos_core::ClientConfig;
    use std::collections::HashMap;

    fn cache() -> Arc<ReferenceCache> {
        let categories = vec![
            Category {
                id: "k-1".to_string(),
                name: "Vinç".to_string(),
                sub_categories: vec!["Kule Vinç".to_string(), "Mobil Vinç".to_string()],
                description: None,
                created_at: Utc::now(),
            },
            Category {
                id: "k-2".to_string(),
                name: "Jeneratör".to_string(),
                sub_categories: Vec::new(),
                description: None,
                created_at: Utc::now(),
            },
        ];
        let projects = vec![Project {
            id: "p-1".to_string(),
            name: "Ankara Konut Projesi".to_string(),
            code: Some("ANK-01".to_string()),
            location: Some("Ankara".to_string()),
            status: ProjectStatus::Active,
            start_date: None,
            end_date: None,
            description: None,
            created_at: Utc::now(),
        }];
        let cities = vec![City::new("ANK", "Ankara"), City::new("IST", "İstanbul")];
        Arc::new(ReferenceCache::from_parts(
            categories,
            HashMap::new(),
            projects,
            cities,
        ))
    }

    fn form() -> ReportForm {
        let client = ApiClient::new(ClientConfig::default(), Session::new()).unwrap();
        ReportForm::with_cache(client, cache(), None)
    }

    #[test]
    fn selecting_project_autofills_city_from_location() {
        let mut form = form();
        form.set_project("p-1");
        assert_eq!(form.draft().city, "Ankara");
    }

    #[test]
    fn unknown_project_leaves_city_untouched() {
        let mut form = form();
        form.set_city("İstanbul");
        form.set_project("p-unknown");
        assert_eq!(form.draft().city, "İstanbul");
    }

    #[test]
    fn category_change_always_resets_sub_category() {
        let mut form = form();
        form.set_category("Vinç");
        form.set_sub_category(Some("Kule Vinç".to_string())).unwrap();
        assert_eq!(form.draft().sub_category.as_deref(), Some("Kule Vinç"));

        form.set_category("Jeneratör");
        assert_eq!(form.draft().sub_category, None);
        assert!(!form.sub_category_enabled());
    }

    #[test]
    fn sub_category_outside_options_is_rejected() {
        let mut form = form();
        form.set_category("Vinç");
        let err = form
            .set_sub_category(Some("Buhar Kazanı".to_string()))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn validation_lists_every_missing_required_field() {
        let form = form();
        let err = form.validate().unwrap_err();
        let message = err.to_string();
        for label in ["Proje", "Şehir", "Ekipman Adı", "Kategori", "Firma"] {
            assert!(message.contains(label), "missing label {label}: {message}");
        }
    }

    #[test]
    fn staging_rejects_per_file_without_blocking_batch() {
        let mut form = form();
        let rejected = form.stage_batch(
            FileSlot::Image,
            vec![
                StagedFile::new("foto.jpg", vec![1, 2, 3]),
                StagedFile::new("notlar.txt", vec![4, 5]),
                StagedFile::new("plan.png", vec![6]),
            ],
        );
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].file_name, "notlar.txt");
        assert_eq!(form.staged_images().len(), 2);
    }

    #[test]
    fn document_slot_takes_pdf_but_not_jpg() {
        let mut form = form();
        assert!(form
            .stage_document(StagedFile::new("rapor.pdf", vec![1]))
            .is_ok());
        assert!(form
            .stage_document(StagedFile::new("foto.jpg", vec![1]))
            .is_err());
        assert_eq!(form.staged_documents().len(), 1);
    }
}
