//! Response construction for served uploads.

use crate::error::HttpAppError;
use crate::services::ServedContent;
use axum::body::Body;
use axum::response::Response;
use dropgo_core::constants::{DEFAULT_MIME_TYPE, RANGE_UNIT_BYTES};
use dropgo_core::{AppError, ServingPlan};
use http::{header, HeaderValue, StatusCode};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// RFC 5987 `attr-char`: everything outside this set is percent-encoded.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Force a client-side save.
    Attachment,
    /// Render in place.
    Inline,
}

impl Disposition {
    fn as_str(self) -> &'static str {
        match self {
            Disposition::Attachment => "attachment",
            Disposition::Inline => "inline",
        }
    }
}

/// `Content-Disposition` value with a quoted ASCII fallback and a UTF-8 `filename*` form.
pub fn content_disposition(disposition: Disposition, filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_control() || !c.is_ascii() => '_',
            c => c,
        })
        .collect();

    format!(
        "{}; filename=\"{}\"; filename*=UTF-8''{}",
        disposition.as_str(),
        fallback,
        utf8_percent_encode(filename, ATTR_CHAR)
    )
}

/// Build the response for a served upload.
///
/// `advertise_ranges` adds `Accept-Ranges: bytes`. Partial plans answer `206` with a
/// `Content-Range`; full plans answer `200`.
pub fn content_response(
    content: ServedContent,
    disposition: Disposition,
    advertise_ranges: bool,
) -> Result<Response, HttpAppError> {
    let status = match content.plan {
        ServingPlan::Full { .. } => StatusCode::OK,
        ServingPlan::Partial { .. } => StatusCode::PARTIAL_CONTENT,
        ServingPlan::Unsatisfiable { total_length } => {
            return Err(AppError::RangeNotSatisfiable { total_length }.into());
        }
    };

    let content_type = HeaderValue::from_str(&content.mime_type).unwrap_or_else(|_| {
        tracing::debug!(upload_id = %content.upload_id, mime_type = %content.mime_type, "Invalid MIME type in metadata");
        HeaderValue::from_static(DEFAULT_MIME_TYPE)
    });

    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, content.plan.content_length())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(disposition, &content.filename),
        )
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff");

    if advertise_ranges {
        builder = builder.header(header::ACCEPT_RANGES, RANGE_UNIT_BYTES);
    }

    if let Some(content_range) = content.plan.content_range() {
        builder = builder.header(header::CONTENT_RANGE, content_range);
    }

    builder.body(Body::from_stream(content.body)).map_err(|e| {
        tracing::error!(error = %e, upload_id = %content.upload_id, "Failed to build response");
        AppError::Internal(e.to_string()).into()
    })
}
