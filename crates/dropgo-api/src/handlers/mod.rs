pub mod content_response;
pub mod files;
pub mod stream;
