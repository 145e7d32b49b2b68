//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use dropgo_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dropgo API",
        version = "0.1.0",
        description = "Catalog and byte-range delivery for completed resumable uploads. Lists uploads whose data has fully arrived, serves them as downloads or seekable inline streams, and deletes them."
    ),
    paths(
        handlers::files::list_files,
        handlers::files::download_file,
        handlers::files::delete_file,
        handlers::stream::stream_file,
    ),
    components(
        schemas(
            models::UploadSummary,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "files", description = "Listing, download and deletion of complete uploads"),
        (name = "stream", description = "Inline delivery with HTTP range support"),
    )
)]
pub struct ApiDoc;
