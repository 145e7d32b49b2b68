//! Upload sidecar records and the listing-facing summary derived from them.

use crate::constants::{DEFAULT_MIME_TYPE, META_FILENAME, META_FILETYPE, META_RELATIVE_PATH};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// Sidecar record written by the upload collaborator next to each data file.
///
/// Field names follow the tus file-store `.info` layout. `ID`, `Size` and `Offset` are
/// required; everything else is optional. Negative sizes or wrongly typed fields fail to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    #[serde(rename = "ID")]
    pub id: String,

    /// Total byte length the upload is expected to reach.
    #[serde(rename = "Size")]
    pub declared_size: u64,

    /// Bytes written when the sidecar was last updated. Advisory only: it can lag the
    /// data file, so completion is always derived from the live file length.
    #[serde(rename = "Offset")]
    pub bytes_written: u64,

    #[serde(rename = "SizeIsDeferred", default)]
    pub size_is_deferred: bool,

    #[serde(rename = "MetaData", default, deserialize_with = "null_as_empty")]
    pub metadata: UploadMetadata,

    #[serde(rename = "IsPartial", default)]
    pub is_partial: bool,

    #[serde(rename = "IsFinal", default)]
    pub is_final: bool,

    #[serde(rename = "PartialUploads", default)]
    pub partial_uploads: Option<Vec<String>>,

    #[serde(rename = "Storage", default)]
    pub storage: Option<HashMap<String, String>>,
}

impl UploadRecord {
    /// Parse a sidecar document. Any structural problem is reported as `Malformed`.
    pub fn from_json(bytes: &[u8]) -> Result<Self, AppError> {
        serde_json::from_slice(bytes).map_err(AppError::from)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<UploadMetadata, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<UploadMetadata>::deserialize(deserializer)?.unwrap_or_default())
}

/// Free-form key/value metadata attached to an upload.
///
/// Recognized keys are `filename`, `filetype` and `relativePath`; each has a fallback
/// when absent or empty (the upload id, `application/octet-stream`, and `""`).
/// Other keys are preserved but never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadMetadata(HashMap<String, String>);

impl UploadMetadata {
    fn non_empty(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// Original filename, falling back to the upload id.
    pub fn filename_or<'a>(&'a self, id: &'a str) -> &'a str {
        self.non_empty(META_FILENAME).unwrap_or(id)
    }

    /// MIME type, falling back to `application/octet-stream`.
    pub fn mime_type(&self) -> &str {
        self.non_empty(META_FILETYPE).unwrap_or(DEFAULT_MIME_TYPE)
    }

    /// Client-relative path for folder uploads, empty when absent.
    pub fn relative_path(&self) -> &str {
        self.non_empty(META_RELATIVE_PATH).unwrap_or("")
    }
}

/// A complete upload as reported by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub id: String,
    /// Resolved filename
    pub name: String,
    /// Actual on-disk byte count
    pub size: u64,
    pub mime_type: String,
    pub relative_path: String,
    /// Always true: incomplete uploads are never listed
    pub completed: bool,
}

impl UploadSummary {
    pub fn from_record(id: &str, record: &UploadRecord, size: u64) -> Self {
        Self {
            id: id.to_string(),
            name: record.metadata.filename_or(id).to_string(),
            size,
            mime_type: record.metadata.mime_type().to_string(),
            relative_path: record.metadata.relative_path().to_string(),
            completed: true,
        }
    }
}
