//! Upload completion check.

use crate::models::UploadRecord;

/// Whether an upload is complete, given the live length of its data file.
///
/// The only signal is `actual_size == declared_size`. The sidecar's `bytes_written`
/// is never consulted, and an upload whose length is still deferred has no target
/// to compare against, so it is never complete. Callers must pass a freshly observed
/// size on every call.
pub fn is_complete(record: &UploadRecord, actual_size: u64) -> bool {
    !record.size_is_deferred && actual_size == record.declared_size
}
