//! Dropgo Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration and the pure
//! decision logic (upload completion, byte-range resolution, identifier validation)
//! shared by the storage and API crates.

pub mod completion;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod range;
pub mod validation;

// Re-export commonly used types
pub use completion::is_complete;
pub use config::{Config, ServerConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{UploadMetadata, UploadRecord, UploadSummary};
pub use range::{resolve_range, ByteWindow, ServingPlan};
pub use validation::validate_upload_id;
