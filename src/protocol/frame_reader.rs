//! Frame reader for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` so bodies are split off the read buffer without
//! copying. Implements a state machine for fragmented input:
//! - `WaitingForHeaders`: need a complete header block (blank-line terminated)
//! - `WaitingForBody`: headers parsed, need `Content-Length` more bytes
//!
//! The first block of a connection is the handshake block, which does not
//! need a `Content-Length`. Every later block must carry one.
//!
//! # Example
//!
//! ```
//! use v8debug_client::protocol::{Block, FrameReader};
//!
//! let mut reader = FrameReader::new();
//!
//! // Data arrives in chunks from the socket
//! let blocks = reader.push(b"Protocol-Version: 1\r\n\r\nContent-Len").unwrap();
//! assert!(matches!(blocks[0], Block::Handshake(_)));
//!
//! let blocks = reader.push(b"gth: 2\r\n\r\n{}").unwrap();
//! assert!(matches!(&blocks[0], Block::Frame(frame) if frame.body() == b"{}"));
//! ```

use bytes::BytesMut;

use super::frame::{Block, Frame};
use super::header::{
    content_length, find_block_end, parse_header_block, Headers, DEFAULT_MAX_CONTENT_LENGTH,
    DEFAULT_MAX_HEADER_SIZE,
};
use crate::error::{Error, Result};

/// State machine for frame parsing.
#[derive(Debug, Clone)]
enum State {
    /// Waiting for a complete header block.
    WaitingForHeaders,
    /// Header block parsed, waiting for `length` body bytes.
    WaitingForBody {
        headers: Headers,
        length: usize,
        handshake: bool,
    },
}

/// Buffer for accumulating incoming bytes and extracting complete blocks.
///
/// Feeding the stream in one push or in chunks of any size (down to single
/// bytes) yields the same blocks in the same order. Bytes past the last
/// complete block stay buffered for the next push.
///
/// A framing error found after some blocks of the same push is held back:
/// the push returns those blocks and the error is reported by
/// [`take_error`](Self::take_error) or the next push. After an error the
/// reader is left in an unspecified state; the connection it belongs to is
/// expected to be dropped.
#[derive(Debug)]
pub struct FrameReader {
    /// Accumulated bytes from socket reads.
    buffer: BytesMut,
    /// Current parsing state.
    state: State,
    /// Buffer length at the last header scan that found no terminator.
    scanned: usize,
    /// True until the handshake block has been consumed.
    handshake_pending: bool,
    /// Maximum size of one header block.
    max_header_size: usize,
    /// Maximum accepted `Content-Length`.
    max_content_length: usize,
    /// Framing error found behind blocks that were already returned.
    error: Option<Error>,
}

impl FrameReader {
    /// Create a new frame reader with default limits.
    ///
    /// Default header block limit: 8 KiB, max body: 64 MiB.
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_HEADER_SIZE, DEFAULT_MAX_CONTENT_LENGTH)
    }

    /// Create a new frame reader with custom limits.
    pub fn with_limits(max_header_size: usize, max_content_length: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(64 * 1024),
            state: State::WaitingForHeaders,
            scanned: 0,
            handshake_pending: true,
            max_header_size,
            max_content_length,
            error: None,
        }
    }

    /// Create a reader for a stream whose handshake was already consumed.
    ///
    /// Every block is then treated as a `Content-Length` framed message.
    pub fn without_handshake() -> Self {
        Self::new().skip_handshake()
    }

    /// Treat the handshake as already consumed.
    pub fn skip_handshake(mut self) -> Self {
        self.handshake_pending = false;
        self
    }

    /// Push data into the buffer and extract all complete blocks.
    ///
    /// Returns the blocks in arrival order; may be empty if more data is
    /// needed. Blocks completed before a framing error are still returned;
    /// the error is then held for [`take_error`](Self::take_error).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Framing`] on a malformed header block, a missing or
    /// non-numeric `Content-Length`, or a size limit violation, when no
    /// complete block precedes it. A held error is returned here too.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Block>> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }

        self.buffer.extend_from_slice(data);

        let mut blocks = Vec::new();
        loop {
            match self.try_extract_one() {
                Ok(Some(block)) => blocks.push(block),
                Ok(None) => break,
                Err(e) if blocks.is_empty() => return Err(e),
                Err(e) => {
                    self.error = Some(e);
                    break;
                }
            }
        }

        Ok(blocks)
    }

    /// Take a framing error held back by the last push.
    pub fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }

    /// Try to extract a single block from the buffer.
    fn try_extract_one(&mut self) -> Result<Option<Block>> {
        match std::mem::replace(&mut self.state, State::WaitingForHeaders) {
            State::WaitingForHeaders => self.try_extract_headers(),

            State::WaitingForBody {
                headers,
                length,
                handshake,
            } => {
                if self.buffer.len() < length {
                    self.state = State::WaitingForBody {
                        headers,
                        length,
                        handshake,
                    };
                    return Ok(None);
                }

                let body = self.buffer.split_to(length).freeze();

                if handshake {
                    tracing::trace!(len = body.len(), "Discarding handshake body");
                    return Ok(Some(Block::Handshake(headers)));
                }

                Ok(Some(Block::Frame(Frame::new(headers, body))))
            }
        }
    }

    fn try_extract_headers(&mut self) -> Result<Option<Block>> {
        let end = match find_block_end(&self.buffer, self.scanned) {
            Some(end) => end,
            None => {
                if self.buffer.len() > self.max_header_size {
                    return Err(Error::Framing(format!(
                        "Header block exceeds maximum {} bytes",
                        self.max_header_size
                    )));
                }
                self.scanned = self.buffer.len();
                return Ok(None);
            }
        };

        if end > self.max_header_size {
            return Err(Error::Framing(format!(
                "Header block size {} exceeds maximum {}",
                end, self.max_header_size
            )));
        }

        let block = self.buffer.split_to(end);
        self.scanned = 0;

        let headers = parse_header_block(&block)?;
        let handshake = std::mem::replace(&mut self.handshake_pending, false);

        let length = match content_length(&headers)? {
            Some(length) => length,
            None if handshake => return Ok(Some(Block::Handshake(headers))),
            None => {
                return Err(Error::Framing(
                    "Missing Content-Length header".to_string(),
                ))
            }
        };

        if length > self.max_content_length {
            return Err(Error::Framing(format!(
                "Content-Length {} exceeds maximum {}",
                length, self.max_content_length
            )));
        }

        self.state = State::WaitingForBody {
            headers,
            length,
            handshake,
        };

        // Body may already be buffered
        self.try_extract_one()
    }

    /// True when no partial block is buffered.
    ///
    /// A clean end of stream is only possible in this state.
    pub fn is_idle(&self) -> bool {
        self.error.is_none()
            && matches!(self.state, State::WaitingForHeaders)
            && self.buffer.is_empty()
    }

    /// True once the handshake block has been consumed.
    pub fn handshake_received(&self) -> bool {
        !self.handshake_pending
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Describe what the reader is waiting for, for error messages.
    pub(crate) fn pending_description(&self) -> String {
        match &self.state {
            State::WaitingForHeaders => {
                format!("{} bytes of an incomplete header block", self.buffer.len())
            }
            State::WaitingForBody { length, .. } => format!(
                "{} of {} body bytes",
                self.buffer.len(),
                length
            ),
        }
    }

    /// Get the current state for debugging.
    #[cfg(test)]
    fn state_name(&self) -> &'static str {
        match &self.state {
            State::WaitingForHeaders => "WaitingForHeaders",
            State::WaitingForBody { .. } => "WaitingForBody",
        }
    }
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new()
    }
}
