//! Byte-range resolution for partial-content responses.
//!
//! A `Range` header value is resolved against the authoritative total length into a
//! [`ServingPlan`]. Parsing is permissive: unparseable numbers count as missing and
//! fall back to the defaults below, so resolution itself never fails.
//!
//! Rules, in order:
//! 1. missing start defaults to 0, missing end to `total - 1`
//! 2. `start > end` or `start >= total` is unsatisfiable
//! 3. `end >= total` is clamped to `total - 1`
//! 4. otherwise the window `[start, end]` is served as partial content
//!
//! The `bytes=` prefix is optional: `500-` and `bytes=500-` resolve alike. A value
//! naming any other unit (`items=0-5`) is ignored. Only the first expression of a
//! multi-range header is considered. Suffix ranges (`bytes=-N`) get no special
//! meaning: the start is missing and defaults to 0.

use crate::constants::RANGE_UNIT_BYTES;

/// Inclusive byte window inside a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteWindow {
    /// Starting byte position (inclusive)
    pub start: u64,
    /// Ending byte position (inclusive)
    pub end: u64,
}

impl ByteWindow {
    /// Number of bytes covered by the window
    pub fn size(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// How a single request for a resource of known length should be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServingPlan {
    /// No range requested: the whole resource, `200 OK`.
    Full { total_length: u64 },
    /// A satisfiable range: `206 Partial Content`.
    Partial { window: ByteWindow, total_length: u64 },
    /// A well-formed range outside the resource: `416`, zero bytes.
    Unsatisfiable { total_length: u64 },
}

impl ServingPlan {
    pub fn total_length(&self) -> u64 {
        match self {
            ServingPlan::Full { total_length }
            | ServingPlan::Partial { total_length, .. }
            | ServingPlan::Unsatisfiable { total_length } => *total_length,
        }
    }

    /// Bytes to transfer, or `None` when nothing is transferred (unsatisfiable, or a
    /// full response for an empty resource).
    pub fn window(&self) -> Option<ByteWindow> {
        match self {
            ServingPlan::Full { total_length } if *total_length > 0 => Some(ByteWindow {
                start: 0,
                end: total_length - 1,
            }),
            ServingPlan::Partial { window, .. } => Some(*window),
            _ => None,
        }
    }

    /// Exact number of body bytes the response must carry.
    pub fn content_length(&self) -> u64 {
        self.window().map(|w| w.size()).unwrap_or(0)
    }

    /// `Content-Range` header value, for partial and unsatisfiable plans.
    pub fn content_range(&self) -> Option<String> {
        match self {
            ServingPlan::Full { .. } => None,
            ServingPlan::Partial {
                window,
                total_length,
            } => Some(format!(
                "{} {}-{}/{}",
                RANGE_UNIT_BYTES, window.start, window.end, total_length
            )),
            ServingPlan::Unsatisfiable { total_length } => {
                Some(format!("{} */{}", RANGE_UNIT_BYTES, total_length))
            }
        }
    }
}

/// Resolve an optional `Range` header value against `total_length`.
///
/// Absent or blank input, or a unit other than `bytes`, yields [`ServingPlan::Full`].
/// A bare expression without any unit is read as bytes.
pub fn resolve_range(header: Option<&str>, total_length: u64) -> ServingPlan {
    let Some(value) = header.map(str::trim).filter(|h| !h.is_empty()) else {
        return ServingPlan::Full { total_length };
    };

    let Some(ranges) = strip_bytes_unit(value) else {
        tracing::debug!(range = %value, "Ignoring range with unsupported unit");
        return ServingPlan::Full { total_length };
    };

    // Multi-range requests are answered with their first expression only.
    let first = ranges.split(',').next().unwrap_or("").trim();
    let (start_part, end_part) = first.split_once('-').unwrap_or((first, ""));

    let start = parse_position(start_part).unwrap_or(0);
    let end = parse_position(end_part).unwrap_or_else(|| total_length.saturating_sub(1));

    if start > end || start >= total_length {
        return ServingPlan::Unsatisfiable { total_length };
    }

    let end = end.min(total_length - 1);

    ServingPlan::Partial {
        window: ByteWindow { start, end },
        total_length,
    }
}

/// The range set after an optional `bytes=` prefix, or `None` for a foreign unit.
fn strip_bytes_unit(value: &str) -> Option<&str> {
    match value.split_once('=') {
        None => Some(value),
        Some((unit, ranges)) => unit
            .trim()
            .eq_ignore_ascii_case(RANGE_UNIT_BYTES)
            .then_some(ranges),
    }
}

fn parse_position(part: &str) -> Option<u64> {
    part.trim().parse::<u64>().ok()
}
