//! Upload route groups.

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

pub fn file_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/files", API_PREFIX),
            get(handlers::files::list_files),
        )
        .route(
            &format!("{}/files/{{id}}", API_PREFIX),
            get(handlers::files::download_file).delete(handlers::files::delete_file),
        )
        .route(
            &format!("{}/files/", API_PREFIX),
            get(handlers::files::missing_file_id).delete(handlers::files::missing_file_id),
        )
}

pub fn stream_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/stream/{{id}}", API_PREFIX),
            get(handlers::stream::stream_file),
        )
        .route(
            &format!("{}/stream/", API_PREFIX),
            get(handlers::files::missing_file_id),
        )
}
