//! File admission rules for attachment uploads.
//!
//! Admission runs entirely client-side, before any network call: a file that
//! exceeds the size cap or falls outside the slot's allow-list is rejected
//! with a per-file error and never produces a request. Content types are
//! resolved from the filename extension because the backend does not reliably
//! echo one.

use crate::constants::MAX_ATTACHMENT_BYTES;
use crate::error::AppError;

/// Which upload control a file was handed to. Each slot carries its own
/// content-type allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSlot {
    /// Form image slot: jpeg/png only.
    Image,
    /// Form "other files" slot: pdf and Word documents.
    Document,
    /// Ad-hoc upload on the report detail view: jpeg/png/pdf.
    Attachment,
}

impl FileSlot {
    pub fn allowed_types(self) -> &'static [&'static str] {
        match self {
            FileSlot::Image => &["image/jpeg", "image/png"],
            FileSlot::Document => &[
                "application/pdf",
                "application/msword",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ],
            FileSlot::Attachment => &["image/jpeg", "image/png", "application/pdf"],
        }
    }
}

/// Lowercased extension of a filename, without the dot.
pub fn extension_of(filename: &str) -> Option<String> {
    let ext = filename.rsplit_once('.')?.1;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}

/// Resolve a content type from the filename extension.
pub fn mime_type_for(filename: &str) -> Option<&'static str> {
    match extension_of(filename)?.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        _ => None,
    }
}

/// Admit a file into a slot. Returns the resolved content type on success.
///
/// Size is checked before type so an oversized file of an allowed type still
/// reports the size problem.
pub fn admit_file(slot: FileSlot, filename: &str, size: u64) -> Result<&'static str, AppError> {
    if size > MAX_ATTACHMENT_BYTES {
        return Err(AppError::PayloadTooLarge(format!(
            "{}: dosya boyutu 4GB'dan büyük olamaz",
            filename
        )));
    }

    let content_type = mime_type_for(filename).ok_or_else(|| {
        AppError::UnsupportedFileType(format!("{}: dosya türü tanınmadı", filename))
    })?;

    if !slot.allowed_types().contains(&content_type) {
        return Err(AppError::UnsupportedFileType(format!(
            "{}: bu alan için desteklenmeyen dosya türü ({})",
            filename, content_type
        )));
    }

    Ok(content_type)
}
