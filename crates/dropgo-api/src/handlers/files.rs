use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::content_response::{content_response, Disposition};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dropgo_core::{AppError, UploadSummary};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    responses(
        (status = 200, description = "Complete uploads", body = [UploadSummary]),
        (status = 500, description = "Upload directory could not be read", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UploadSummary>>, HttpAppError> {
    let summaries = state.catalog.list().await?;
    Ok(Json(summaries))
}

#[utoipa::path(
    get,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = String, Path, description = "Upload ID")
    ),
    responses(
        (status = 200, description = "Upload content as an attachment", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid ID or upload not complete", body = ErrorResponse),
        (status = 404, description = "Upload not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn download_file(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpAppError> {
    let content = state.content.download(&id).await?;

    tracing::debug!(
        upload_id = %id,
        size_bytes = content.plan.content_length(),
        "Serving download"
    );

    content_response(content, Disposition::Attachment, false)
}

#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = String, Path, description = "Upload ID")
    ),
    responses(
        (status = 204, description = "Upload deleted"),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Upload not found", body = ErrorResponse),
        (status = 500, description = "Data file could not be removed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_file(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.content.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Requests that address a file without naming one.
pub async fn missing_file_id() -> HttpAppError {
    HttpAppError(AppError::BadRequest("File ID required".to_string()))
}
