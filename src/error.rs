//! Error types for v8debug-client.

use thiserror::Error;

/// Main error type for connection-level failures.
///
/// Every variant except [`Error::Json`] is fatal for the connection when it
/// comes out of the read loop.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error on the underlying stream that was not caused by a local close.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed header block or `Content-Length`.
    #[error("Framing error: {0}")]
    Framing(String),

    /// Stream ended in the middle of a header block or body.
    #[error("Stream truncated: {0}")]
    Truncated(String),

    /// JSON serialization error (outbound commands).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Output stream already shut down.
    #[error("Connection closed")]
    ConnectionClosed,
}

/// A frame body that was framed correctly but could not be decoded.
///
/// Recoverable: the read loop reports it and moves on to the next frame.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Body is not valid UTF-8.
    #[error("body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Body is not valid JSON.
    #[error("malformed JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// JSON is valid but does not have the shape of a `kind` message.
    #[error("unexpected {kind} structure: {source}")]
    Shape {
        /// What the message was classified as.
        kind: &'static str,
        /// Underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
