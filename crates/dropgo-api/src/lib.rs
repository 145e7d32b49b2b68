//! Dropgo API Library
//!
//! HTTP surface over the shared upload directory: catalog listing, downloads, ranged
//! streaming and deletion, plus application setup.

mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
pub mod services;
pub mod setup;
mod telemetry;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use api_doc::ApiDoc;
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
