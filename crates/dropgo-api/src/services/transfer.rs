//! Byte transfer from an opened data file.
//!
//! A transfer carries exactly the bytes of one window. Running out of data before the
//! window is exhausted ends the stream with an `UnexpectedEof` error instead of a short
//! body, and a transfer dropped before completion (client went away) is logged and its
//! file handle released.

use bytes::Bytes;
use dropgo_core::ByteWindow;
use dropgo_storage::{DataFile, DataReader};
use futures::stream::{self, BoxStream, StreamExt};
use std::io::{self, SeekFrom};
use tokio::io::{AsyncReadExt, AsyncSeekExt, Take};
use tokio_util::io::ReaderStream;

/// Response body stream for a transfer.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

struct TransferState {
    inner: ReaderStream<Take<Box<dyn DataReader>>>,
    guard: TransferGuard,
    done: bool,
}

struct TransferGuard {
    upload_id: String,
    expected: u64,
    sent: u64,
    finished: bool,
}

impl Drop for TransferGuard {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!(
                upload_id = %self.upload_id,
                sent_bytes = self.sent,
                expected_bytes = self.expected,
                "Transfer abandoned before completion"
            );
        }
    }
}

/// Position `file` at the start of `window` and stream exactly `window.size()` bytes.
///
/// `None` yields an empty body. Seek failures surface before any byte is sent.
pub async fn window_stream(
    upload_id: &str,
    mut file: DataFile,
    window: Option<ByteWindow>,
    chunk_size: usize,
) -> io::Result<ByteStream> {
    let Some(window) = window else {
        return Ok(stream::empty().boxed());
    };

    file.reader.seek(SeekFrom::Start(window.start)).await?;

    let expected = window.size();
    let state = TransferState {
        inner: ReaderStream::with_capacity(file.reader.take(expected), chunk_size.max(1)),
        guard: TransferGuard {
            upload_id: upload_id.to_string(),
            expected,
            sent: 0,
            finished: false,
        },
        done: false,
    };

    Ok(stream::unfold(state, next_chunk).boxed())
}

async fn next_chunk(mut state: TransferState) -> Option<(io::Result<Bytes>, TransferState)> {
    if state.done {
        return None;
    }

    if state.guard.sent >= state.guard.expected {
        state.guard.finished = true;
        return None;
    }

    match state.inner.next().await {
        Some(Ok(chunk)) => {
            state.guard.sent += chunk.len() as u64;
            Some((Ok(chunk), state))
        }
        Some(Err(e)) => {
            tracing::warn!(
                upload_id = %state.guard.upload_id,
                error = %e,
                sent_bytes = state.guard.sent,
                "Transfer failed while reading data file"
            );
            state.guard.finished = true;
            state.done = true;
            Some((Err(e), state))
        }
        None => {
            tracing::warn!(
                upload_id = %state.guard.upload_id,
                sent_bytes = state.guard.sent,
                expected_bytes = state.guard.expected,
                "Data file ended before the requested window"
            );
            let err = io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "data file ended after {} of {} bytes",
                    state.guard.sent, state.guard.expected
                ),
            );
            state.guard.finished = true;
            state.done = true;
            Some((Err(err), state))
        }
    }
}
