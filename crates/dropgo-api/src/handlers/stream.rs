use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::content_response::{content_response, Disposition};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::Response,
};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/stream/{id}",
    tag = "stream",
    params(
        ("id" = String, Path, description = "Upload ID"),
        ("Range" = Option<String>, Header, description = "Single byte range, e.g. `bytes=0-1023`")
    ),
    responses(
        (status = 200, description = "Whole upload, inline", content_type = "application/octet-stream"),
        (status = 206, description = "Requested byte window", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid ID or upload not complete", body = ErrorResponse),
        (status = 404, description = "Upload not found", body = ErrorResponse),
        (status = 416, description = "Range outside the upload; Content-Range reports the total length", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers))]
pub async fn stream_file(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    // A Range value that is not valid header text is treated like no range at all.
    let range = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());

    let content = state.content.stream(&id, range).await?;

    content_response(content, Disposition::Inline, true)
}
