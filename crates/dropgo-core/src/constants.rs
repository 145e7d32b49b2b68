//! Shared constants for the upload store layout and response defaults.

/// Suffix of the sidecar record that sits next to every data file (`{root}/{id}.info`).
pub const SIDECAR_SUFFIX: &str = ".info";

/// MIME type reported when the sidecar carries no `filetype`.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Recognized sidecar metadata keys.
pub const META_FILENAME: &str = "filename";
pub const META_FILETYPE: &str = "filetype";
pub const META_RELATIVE_PATH: &str = "relativePath";

/// Range unit accepted in `Range` request headers.
pub const RANGE_UNIT_BYTES: &str = "bytes";

/// Sidecar file name for an upload identifier.
pub fn sidecar_name(id: &str) -> String {
    format!("{}{}", id, SIDECAR_SUFFIX)
}

/// Upload identifier for a sidecar file name, or `None` if the name is not a sidecar.
pub fn id_from_sidecar_name(name: &str) -> Option<&str> {
    name.strip_suffix(SIDECAR_SUFFIX).filter(|id| !id.is_empty())
}
