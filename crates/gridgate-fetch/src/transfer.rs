//! Transfer adapters between the transport and the shared byte buffer.

use bytes::Bytes;
use futures::Stream;
use futures::StreamExt;
use gridgate_types::ChunkBuffer;
use reqwest::Response;
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Upper bound on the size of one outbound chunk.
pub const TRANSFER_CHUNK: usize = 8 * 1024;

/// Outbound adapter: drains a [`ChunkBuffer`] as a byte stream for the
/// request body.
///
/// Each pull yields up to [`TRANSFER_CHUNK`] bytes from the buffer's
/// read cursor; the stream ends when the buffer is exhausted and stays
/// ended on further pulls.
#[derive(Debug)]
pub struct OutboundBody {
    buffer: ChunkBuffer,
}

impl OutboundBody {
    /// Wraps a buffer, rewinding its read cursor to the start.
    #[must_use]
    pub fn new(mut buffer: ChunkBuffer) -> Self {
        buffer.reset_cursor();
        Self { buffer }
    }
}

impl Stream for OutboundBody {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let chunk = self.get_mut().buffer.read_next(TRANSFER_CHUNK);
        if chunk.is_empty() {
            Poll::Ready(None)
        } else {
            Poll::Ready(Some(Ok(Bytes::copy_from_slice(chunk))))
        }
    }
}

impl From<OutboundBody> for reqwest::Body {
    fn from(body: OutboundBody) -> Self {
        Self::wrap_stream(body)
    }
}

/// Inbound buffering adapter: appends every transport chunk to the
/// buffer, materializing the whole response.
///
/// Used for the login exchange, where the caller needs the complete body
/// before extracting the token.
///
/// # Errors
///
/// Returns an error if the transport fails mid-body.
pub async fn collect_response(
    response: Response,
    buffer: &mut ChunkBuffer,
) -> Result<(), reqwest::Error> {
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        buffer.append(&chunk?);
    }
    Ok(())
}
