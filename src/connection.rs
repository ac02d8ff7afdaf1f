//! Connection builder and read loop.
//!
//! A [`Connection`] owns the input half of a debugger stream. [`Connection::run`]
//! reads until the stream ends, a fatal error occurs, or the connection is
//! closed through its [`CloseHandle`], dispatching every complete block to a
//! [`Listener`]:
//!
//! 1. Read available bytes
//! 2. Push them into the [`FrameReader`]
//! 3. Deliver the handshake to `header`, decode each message frame and deliver
//!    it to `response` / `event` / `unknown`
//! 4. On exit, call `closed`
//!
//! # Example
//!
//! ```ignore
//! use v8debug_client::ConnectionBuilder;
//!
//! let connection = ConnectionBuilder::new()
//!     .max_content_length(16 * 1024 * 1024)
//!     .build(read_half);
//! let close = connection.close_handle();
//!
//! let task = connection.spawn(MyListener::default());
//! // ...
//! close.close();
//! let (listener, result) = task.await?;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::codec::JsonCodec;
use crate::error::{Error, Result};
use crate::listener::Listener;
use crate::message::ParsedMessage;
use crate::protocol::{Block, FrameReader, DEFAULT_MAX_CONTENT_LENGTH, DEFAULT_MAX_HEADER_SIZE};

/// Default size of the socket read buffer.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;

/// Builder for configuring a [`Connection`].
#[derive(Debug, Clone)]
pub struct ConnectionBuilder {
    read_buffer_size: usize,
    max_content_length: usize,
    max_header_size: usize,
    expect_handshake: bool,
}

impl ConnectionBuilder {
    /// Create a builder with default limits.
    pub fn new() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            max_header_size: DEFAULT_MAX_HEADER_SIZE,
            expect_handshake: true,
        }
    }

    /// Set the size of a single socket read.
    ///
    /// Default: 64 KiB
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    /// Set the largest accepted `Content-Length`.
    ///
    /// Default: 64 MiB
    pub fn max_content_length(mut self, limit: usize) -> Self {
        self.max_content_length = limit;
        self
    }

    /// Set the largest accepted header block.
    ///
    /// Default: 8 KiB
    pub fn max_header_size(mut self, limit: usize) -> Self {
        self.max_header_size = limit;
        self
    }

    /// Whether the stream starts with a handshake block.
    ///
    /// Turn this off when the handshake was consumed before the stream was
    /// handed over. Default: true
    pub fn expect_handshake(mut self, expect: bool) -> Self {
        self.expect_handshake = expect;
        self
    }

    /// Build a connection reading from `reader`.
    pub fn build<R: AsyncRead + Unpin>(self, reader: R) -> Connection<R> {
        let mut frames = FrameReader::with_limits(self.max_header_size, self.max_content_length);
        if !self.expect_handshake {
            frames = frames.skip_handshake();
        }

        Connection {
            reader,
            frames,
            close: CloseHandle::new(),
            read_buffer_size: self.read_buffer_size,
        }
    }
}

impl Default for ConnectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Requests a running [`Connection`] to stop.
///
/// Cloneable and usable from any thread or task. Closing wakes a read that
/// is blocked waiting for data; [`Connection::run`] then returns `Ok(())`.
#[derive(Debug, Clone)]
pub struct CloseHandle {
    inner: Arc<CloseSignal>,
}

#[derive(Debug, Default)]
struct CloseSignal {
    closed: AtomicBool,
    notify: Notify,
}

impl CloseHandle {
    fn new() -> Self {
        Self {
            inner: Arc::new(CloseSignal::default()),
        }
    }

    /// Ask the connection to stop. Idempotent.
    pub fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::AcqRel) {
            // notify_one stores a permit if the loop is not waiting yet
            self.inner.notify.notify_one();
        }
    }

    /// True once [`close`](Self::close) has been called.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

/// The input side of a debugger connection.
pub struct Connection<R> {
    reader: R,
    frames: FrameReader,
    close: CloseHandle,
    read_buffer_size: usize,
}

impl<R: AsyncRead + Unpin> Connection<R> {
    /// Create a connection with default settings.
    pub fn new(reader: R) -> Self {
        ConnectionBuilder::new().build(reader)
    }

    /// Handle for stopping this connection from elsewhere.
    pub fn close_handle(&self) -> CloseHandle {
        self.close.clone()
    }

    /// Run the read loop until the stream ends or the connection is closed.
    ///
    /// Callbacks run on the calling task, in wire order. `listener.closed()`
    /// is called exactly once before this returns.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] if a read fails without a close having been requested
    /// - [`Error::Framing`] on a malformed header block
    /// - [`Error::Truncated`] if the stream ends inside a block
    ///
    /// Undecodable message bodies are not errors; they are reported through
    /// [`Listener::decode_error`] and skipped.
    pub async fn run<L: Listener>(self, listener: &mut L) -> Result<()> {
        let result = self.read_loop(listener).await;
        match &result {
            Ok(()) => tracing::debug!("Connection terminated"),
            Err(e) => tracing::debug!("Connection terminated: {}", e),
        }
        listener.closed();
        result
    }

    /// Run the read loop on a new tokio task.
    ///
    /// The task hands the listener back together with the loop's result.
    pub fn spawn<L>(self, mut listener: L) -> JoinHandle<(L, Result<()>)>
    where
        R: Send + 'static,
        L: Listener + Send + 'static,
    {
        tokio::spawn(async move {
            let result = self.run(&mut listener).await;
            if let Err(e) = &result {
                tracing::error!("Read loop error: {}", e);
            }
            (listener, result)
        })
    }

    async fn read_loop<L: Listener>(self, listener: &mut L) -> Result<()> {
        let Connection {
            mut reader,
            mut frames,
            close,
            read_buffer_size,
        } = self;

        let mut buf = vec![0u8; read_buffer_size];

        loop {
            if close.is_closed() {
                tracing::debug!("Close requested");
                return Ok(());
            }

            let read = tokio::select! {
                biased;
                _ = close.inner.notify.notified() => {
                    tracing::debug!("Close requested while reading");
                    return Ok(());
                }
                read = reader.read(&mut buf) => read,
            };

            let n = match read {
                Ok(0) if frames.is_idle() => {
                    tracing::debug!("End of stream");
                    return Ok(());
                }
                Ok(0) => {
                    return Err(Error::Truncated(format!(
                        "end of stream with {} buffered",
                        frames.pending_description()
                    )))
                }
                Ok(n) => n,
                // A local close may surface as a failed read on the socket
                Err(e) if close.is_closed() => {
                    tracing::debug!("Read failed after close: {}", e);
                    return Ok(());
                }
                Err(e) => return Err(Error::Io(e)),
            };

            tracing::trace!("Read {} bytes", n);

            for block in frames.push(&buf[..n])? {
                if close.is_closed() {
                    tracing::debug!("Close requested, dropping remaining blocks");
                    return Ok(());
                }
                dispatch(block, listener);
            }

            // Framing error behind the blocks just delivered
            if let Some(e) = frames.take_error() {
                return Err(e);
            }
        }
    }
}

/// Deliver one block to the listener.
fn dispatch<L: Listener>(block: Block, listener: &mut L) {
    let frame = match block {
        Block::Handshake(headers) => {
            tracing::debug!("Handshake with {} header(s)", headers.len());
            listener.header(&headers);
            return;
        }
        Block::Frame(frame) => frame,
    };

    match JsonCodec::decode(frame.body()) {
        Ok(ParsedMessage::Response(response)) => {
            tracing::debug!(
                "Response seq={} request_seq={} command={} success={}",
                response.seq,
                response.request_seq,
                response.command,
                response.success
            );
            listener.response(response);
        }
        Ok(ParsedMessage::Event(event)) => {
            tracing::debug!("Event seq={} {}", event.seq, event.name);
            listener.event(event);
        }
        Ok(ParsedMessage::Unknown(message)) => {
            tracing::warn!(
                "Unknown message type {:?}",
                message.get("type").and_then(|t| t.as_str())
            );
            listener.unknown(message);
        }
        Err(e) => {
            tracing::warn!("Skipping undecodable frame ({} bytes): {}", frame.body_len(), e);
            listener.decode_error(&e);
        }
    }
}
