//! Attachment handler for a single report.
//!
//! Preview rendering is dispatched on the filename extension, not on a
//! declared content type, because the backend does not reliably echo one.
//! The strategy is resolved once into a tagged variant and carried through
//! the rest of the pipeline.
//!
//! Image previews wrap their bytes in a revocable handle that is released on
//! every exit path (Drop-backed, with an explicit close). PDF previews are
//! re-encoded into a self-contained data URI instead, because embedded
//! document viewers are unreliable with transient handles; a download
//! fallback always accompanies the embedded view.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use base64::Engine;
use bytes::Bytes;

use ekos_api_client::{ApiClient, MessageResponse};
use ekos_core::error::AppError;
use ekos_core::models::{Attachment, UploadResponse};
use ekos_core::validation::{admit_file, extension_of, FileSlot};

/// Preview rendering strategy, resolved once from the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStrategy {
    Image,
    Document,
    /// No inline rendering; offer download only.
    Unsupported,
}

impl PreviewStrategy {
    pub fn for_file_name(file_name: &str) -> Self {
        match extension_of(file_name).as_deref() {
            Some("jpg" | "jpeg" | "png" | "gif" | "webp") => PreviewStrategy::Image,
            Some("pdf") => PreviewStrategy::Document,
            _ => PreviewStrategy::Unsupported,
        }
    }
}

/// Scoped image preview resource.
///
/// Holds the raw bytes for rendering; the handle is acquired when the preview
/// opens and released when it is dropped, on every exit path including
/// errors. [`ImageHandle::release`] makes the close explicit at call sites.
#[derive(Debug)]
pub struct ImageHandle {
    bytes: Bytes,
    live: Arc<AtomicUsize>,
}

impl ImageHandle {
    fn acquire(bytes: Bytes, live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self { bytes, live }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Explicitly close the preview and release the resource.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ImageHandle {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A renderable preview, one variant per strategy.
#[derive(Debug)]
pub enum Preview {
    Image(ImageHandle),
    /// Self-contained embeddable representation plus the filename for the
    /// always-visible download fallback.
    Document { data_uri: String, file_name: String },
    /// Download-only.
    Unsupported { file_name: String },
}

/// Manages the attachment list of one report.
pub struct AttachmentManager {
    client: ApiClient,
    report_id: String,
    attachments: Vec<Attachment>,
    live_previews: Arc<AtomicUsize>,
}

impl AttachmentManager {
    pub fn new(client: ApiClient, report_id: impl Into<String>) -> Self {
        Self {
            client,
            report_id: report_id.into(),
            attachments: Vec::new(),
            live_previews: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn report_id(&self) -> &str {
        &self.report_id
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Whether upload/delete controls may be shown at all. Viewer sessions
    /// never see them; this is the UI predicate, on top of the per-call gate.
    pub fn can_modify(&self) -> bool {
        self.client.session().can_edit()
    }

    /// Number of image previews currently held open.
    pub fn live_preview_count(&self) -> usize {
        self.live_previews.load(Ordering::SeqCst)
    }

    /// Replace the attachment list from the backend.
    pub async fn refresh(&mut self) -> Result<(), AppError> {
        self.attachments = self.client.list_attachments(&self.report_id).await?;
        Ok(())
    }

    fn require_edit(&self) -> Result<(), AppError> {
        if self.can_modify() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Dosya işlemleri için yetkiniz yok".to_string(),
            ))
        }
    }

    /// Upload one file against the report, then re-fetch the list.
    pub async fn upload(
        &mut self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, AppError> {
        self.require_edit()?;
        let content_type = admit_file(FileSlot::Attachment, file_name, bytes.len() as u64)?;
        let response = self
            .client
            .upload_attachment(&self.report_id, file_name, content_type, bytes)
            .await?;
        self.refresh().await?;
        Ok(response)
    }

    /// Delete immediately (no soft-delete, no undo), then re-fetch the list.
    pub async fn delete(&mut self, attachment_id: &str) -> Result<MessageResponse, AppError> {
        self.require_edit()?;
        let response = self.client.delete_attachment(attachment_id).await?;
        self.refresh().await?;
        Ok(response)
    }

    pub async fn download(&self, attachment_id: &str) -> Result<Bytes, AppError> {
        self.client.download_attachment(attachment_id).await
    }

    /// Build a preview for an attachment, fetching content only when the
    /// strategy renders inline.
    pub async fn preview(&self, attachment: &Attachment) -> Result<Preview, AppError> {
        match PreviewStrategy::for_file_name(&attachment.file_name) {
            PreviewStrategy::Image => {
                let bytes = self.download(&attachment.id).await?;
                Ok(Preview::Image(ImageHandle::acquire(
                    bytes,
                    Arc::clone(&self.live_previews),
                )))
            }
            PreviewStrategy::Document => {
                let bytes = self.download(&attachment.id).await?;
                let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
                Ok(Preview::Document {
                    data_uri: format!("data:application/pdf;base64,{}", encoded),
                    file_name: attachment.file_name.clone(),
                })
            }
            PreviewStrategy::Unsupported => Ok(Preview::Unsupported {
                file_name: attachment.file_name.clone(),
            }),
        }
    }
}
