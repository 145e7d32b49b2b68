//! Error types module
//!
//! This module provides the error taxonomy used by every upload operation. Each variant
//! self-describes how it is presented to clients through [`ErrorMetadata`], so the HTTP
//! layer never needs to match on variants itself.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like unknown ids or incomplete uploads
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UPLOAD_INCOMPLETE")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// The upload exists but its data file has not reached the declared size.
    #[error("Upload incomplete: {id} has {actual} of {declared} bytes")]
    Incomplete {
        id: String,
        declared: u64,
        actual: u64,
    },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Range not satisfiable for total length {total_length}")]
    RangeNotSatisfiable { total_length: u64 },

    #[error("Malformed metadata: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(String),

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
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Malformed(err.to_string())
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the upload ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::Incomplete { .. } => (
            400,
            "UPLOAD_INCOMPLETE",
            true,
            Some("Wait for the upload to finish and retry"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidIdentifier(_) => (
            400,
            "INVALID_IDENTIFIER",
            false,
            Some("Use the upload ID exactly as returned by the listing"),
            false,
            LogLevel::Debug,
        ),
        AppError::BadRequest(_) => (
            400,
            "BAD_REQUEST",
            false,
            Some("Check request format and parameters"),
            false,
            LogLevel::Debug,
        ),
        AppError::RangeNotSatisfiable { .. } => (
            416,
            "RANGE_NOT_SATISFIABLE",
            true,
            Some("Retry with a range inside the reported total length"),
            false,
            LogLevel::Debug,
        ),
        AppError::Malformed(_) => (
            500,
            "MALFORMED_METADATA",
            false,
            Some("Contact support if this error persists"),
            true,
            LogLevel::Warn,
        ),
        AppError::Io(_) => (
            500,
            "IO_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::NotFound(_) => "NotFound",
            AppError::Incomplete { .. } => "Incomplete",
            AppError::InvalidIdentifier(_) => "InvalidIdentifier",
            AppError::BadRequest(_) => "BadRequest",
            AppError::RangeNotSatisfiable { .. } => "Unsatisfiable",
            AppError::Malformed(_) => "Malformed",
            AppError::Io(_) => "IOError",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Total length to advertise in `Content-Range: bytes */{n}` for unsatisfiable ranges.
    pub fn unsatisfied_total_length(&self) -> Option<u64> {
        match self {
            AppError::RangeNotSatisfiable { total_length } => Some(*total_length),
            _ => None,
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Incomplete { .. } => "File upload not complete".to_string(),
            AppError::InvalidIdentifier(_) => "Invalid file ID".to_string(),
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::RangeNotSatisfiable { total_length } => {
                format!("Range not satisfiable; total length is {} bytes", total_length)
            }
            AppError::Malformed(_) => "Upload metadata is unreadable".to_string(),
            AppError::Io(_) => "Failed to access storage".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}
