pub mod catalog;
pub mod content;
pub mod metadata;
pub mod transfer;

pub use catalog::CatalogService;
pub use content::{ContentService, ServedContent};
pub use metadata::MetadataReader;
