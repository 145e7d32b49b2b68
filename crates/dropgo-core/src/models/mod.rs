pub mod upload;

pub use upload::{UploadMetadata, UploadRecord, UploadSummary};
