//! Frame types and outbound frame building.
//!
//! A [`Frame`] is one message block: its headers plus the exact number of
//! body bytes announced by `Content-Length`. The body is kept as
//! `bytes::Bytes`, split off the read buffer without copying.
//!
//! # Example
//!
//! ```
//! use v8debug_client::protocol::build_frame;
//!
//! let bytes = build_frame(br#"{"seq":1}"#);
//! assert_eq!(&bytes[..], b"Content-Length: 9\r\n\r\n{\"seq\":1}");
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::header::{encode_header_block, header_value, Headers};

/// A complete message frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Header block of this frame.
    pub headers: Headers,
    /// Body bytes, exactly `Content-Length` long.
    pub body: Bytes,
}

impl Frame {
    /// Create a new frame from headers and body.
    pub fn new(headers: Headers, body: Bytes) -> Self {
        Self { headers, body }
    }

    /// Get a reference to the body bytes.
    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Get the body length in bytes.
    #[inline]
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Look up a header, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }
}

/// One unit produced by the frame reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// The one-time handshake header block that opens a connection.
    Handshake(Headers),
    /// A `Content-Length` delimited message.
    Frame(Frame),
}

/// Build a complete outbound frame: header block followed by `body`.
pub fn build_frame(body: &[u8]) -> Bytes {
    let header = encode_header_block(body.len());
    let mut buf = BytesMut::with_capacity(header.len() + body.len());
    buf.put_slice(header.as_bytes());
    buf.put_slice(body);
    buf.freeze()
}
