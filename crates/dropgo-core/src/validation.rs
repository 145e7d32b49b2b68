//! Upload identifier validation.
//!
//! Identifiers are file name stems inside a flat storage root, so anything that could
//! name a different directory entry is rejected before a path is ever built.

use crate::constants::SIDECAR_SUFFIX;
use crate::error::AppError;

/// Validate an upload identifier taken from a request path.
///
/// Rejects empty identifiers, path separators (`/` and `\`), parent references (`..`),
/// NUL bytes, and identifiers that themselves name a sidecar (`*.info`), since deleting
/// such an id would remove another upload's record.
pub fn validate_upload_id(id: &str) -> Result<(), AppError> {
    if id.is_empty() {
        return Err(AppError::BadRequest("File ID required".to_string()));
    }

    if id.contains('/') || id.contains('\\') || id.contains("..") || id.contains('\0') {
        return Err(AppError::InvalidIdentifier(id.to_string()));
    }

    if id.ends_with(SIDECAR_SUFFIX) {
        return Err(AppError::InvalidIdentifier(id.to_string()));
    }

    Ok(())
}
