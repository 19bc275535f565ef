use bytes::{Buf, BytesMut};
use tracing::trace;

use crate::source::StreamSource;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Reassembles byte chunks into complete lines.
///
/// One framer is owned per monitored stream. After every [`feed`] the buffer
/// holds exactly the suffix of all bytes received so far that follows the
/// last newline seen — never a complete line. A trailing partial line with
/// no terminating newline is never delivered; it is discarded with the
/// framer when the stream is torn down.
///
/// Feeding a single framer from multiple threads is not supported; callers
/// serialize access. Independent streams get independent framers.
///
/// [`feed`]: LineFramer::feed
#[derive(Debug)]
pub struct LineFramer {
    source: StreamSource,
    buf: BytesMut,
}

impl LineFramer {
    /// Create a framer for one output stream.
    pub fn new(source: StreamSource) -> Self {
        Self {
            source,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// The stream this framer is attached to.
    pub fn source(&self) -> StreamSource {
        self.source
    }

    /// Append a chunk and return every complete line it finishes.
    ///
    /// Lines come back in arrival order with the newline stripped (and a
    /// trailing carriage return, if any). An empty chunk — a read that timed
    /// out with no data — returns an empty vec and leaves the buffer
    /// untouched. Invalid UTF-8 inside a line is replaced, not rejected.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        if chunk.is_empty() {
            return Vec::new();
        }

        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(newline) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line = self.buf.split_to(newline + 1);
            line.truncate(newline);
            if line.last() == Some(&b'\r') {
                line.truncate(line.len() - 1);
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }

        trace!(
            source = %self.source,
            chunk_len = chunk.len(),
            lines = lines.len(),
            buffered = self.buf.len(),
            "framed chunk"
        );

        lines
    }

    /// Bytes received since the last emitted line (the current partial line).
    pub fn pending(&self) -> &[u8] {
        self.buf.chunk()
    }

    /// True when no partial line is buffered.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
