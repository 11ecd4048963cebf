//! Error types module
//!
//! All errors are unified under the `AppError` enum. The variants follow the
//! failure taxonomy of the client layer: validation failures that never reach
//! the network, authorization failures that invalidate the session, transient
//! network failures that are retried before being surfaced, and server
//! rejections whose message is shown to the user verbatim.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like transient network errors
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// 4xx response with a message body; the message is surfaced to the user
    /// without client-side reinterpretation.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Network-level failure (connect, timeout, 5xx). Read operations retry
    /// these before surfacing them.
    #[error("Network error: {0}")]
    Transient(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON parsing error: {}", err))
    }
}

impl AppError {
    /// Whether a read operation may retry after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Transient(_))
    }

    /// Whether this error terminates the current session (401 from the
    /// backend). Terminal for the session: the caller must re-authenticate.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized(_))
    }

    /// Whether this error was produced locally, before any network call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::PayloadTooLarge(_)
                | AppError::UnsupportedFileType(_)
                | AppError::Forbidden(_)
        )
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::Validation(_)
            | AppError::PayloadTooLarge(_)
            | AppError::UnsupportedFileType(_)
            | AppError::Unauthorized(_)
            | AppError::Forbidden(_)
            | AppError::NotFound(_)
            | AppError::Rejected { .. } => LogLevel::Debug,
            AppError::Transient(_) => LogLevel::Warn,
            AppError::Internal(_) | AppError::InternalWithSource { .. } => LogLevel::Error,
        }
    }

    /// Message suitable for direct display. Server rejections pass their body
    /// through untouched.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Rejected { message, .. } => message.clone(),
            AppError::InternalWithSource { .. } | AppError::Internal(_) => {
                "Beklenmeyen bir hata oluştu".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_is_retryable_and_warn_level() {
        let err = AppError::Transient("connection reset".to_string());
        assert!(err.is_transient());
        assert!(!err.is_unauthorized());
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn unauthorized_is_terminal_not_transient() {
        let err = AppError::Unauthorized("token expired".to_string());
        assert!(err.is_unauthorized());
        assert!(!err.is_transient());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn rejected_passes_server_message_through() {
        let err = AppError::Rejected {
            status: 400,
            message: "Geçersiz şehir".to_string(),
        };
        assert_eq!(err.client_message(), "Geçersiz şehir");
        assert!(!err.is_transient());
    }

    #[test]
    fn validation_errors_are_local() {
        assert!(AppError::Validation("firma eksik".to_string()).is_local());
        assert!(AppError::PayloadTooLarge("big.pdf".to_string()).is_local());
        assert!(!AppError::Transient("timeout".to_string()).is_local());
    }
}
