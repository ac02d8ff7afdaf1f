//! Command sender for the output half of a debugger connection.
//!
//! Commands are framed the same way inbound messages are:
//! `Content-Length: N\r\n\r\n` followed by the `N` bytes of UTF-8 JSON.
//!
//! # Architecture
//!
//! ```text
//! Front end ─┐
//! Task A    ─┼─► CommandSender (clones) ─► Mutex<W> ─► Socket
//! Task B    ─┘
//! ```
//!
//! Each frame is written and flushed under a single lock acquisition, so
//! frames from concurrent senders never interleave. Sequence numbers come
//! from one [`SequenceGenerator`] shared by all clones of a sender.

use std::io::IoSlice;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::codec::JsonCodec;
use crate::error::{Error, Result};
use crate::message::{Request, SequenceGenerator};
use crate::protocol::encode_header_block;

/// Sends commands to the debuggee.
///
/// Cheaply cloneable; clones share the output stream and sequence numbers.
pub struct CommandSender<W> {
    /// Output stream; `None` once shut down.
    writer: Arc<Mutex<Option<W>>>,
    seq: Arc<SequenceGenerator>,
}

impl<W> Clone for CommandSender<W> {
    fn clone(&self) -> Self {
        Self {
            writer: self.writer.clone(),
            seq: self.seq.clone(),
        }
    }
}

impl<W: AsyncWrite + Unpin> CommandSender<W> {
    /// Create a sender writing to `writer`, numbering requests from 1.
    pub fn new(writer: W) -> Self {
        Self::with_sequence(writer, SequenceGenerator::new())
    }

    /// Create a sender with a custom sequence generator.
    pub fn with_sequence(writer: W, seq: SequenceGenerator) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Some(writer))),
            seq: Arc::new(seq),
        }
    }

    /// Serialize a command to JSON and send it as one frame.
    ///
    /// No response correlation is done here; the response arrives through
    /// the connection's [`Listener`](crate::Listener).
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the command cannot be serialized
    /// - [`Error::ConnectionClosed`] after [`shutdown`](Self::shutdown)
    /// - [`Error::Io`] if the write fails
    pub async fn send<T: Serialize>(&self, command: &T) -> Result<()> {
        let body = JsonCodec::encode(command)?;
        self.send_raw(&body).await
    }

    /// Send a request envelope with the next sequence number.
    ///
    /// Returns the sequence number used, which the matching response echoes
    /// as `request_seq`. The number is taken under the writer lock, so
    /// requests appear on the wire in sequence order.
    pub async fn send_request(
        &self,
        command: impl Into<String>,
        arguments: Option<Value>,
    ) -> Result<u64> {
        let command = command.into();

        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(Error::ConnectionClosed)?;

        let request = Request::new(self.seq.next_seq(), command, arguments);
        let body = JsonCodec::encode(&request)?;
        tracing::debug!("Sending request seq={} command={}", request.seq, request.command);

        write_frame(writer, encode_header_block(body.len()).as_bytes(), &body).await?;
        Ok(request.seq)
    }

    /// Send an already encoded body as one frame.
    pub async fn send_raw(&self, body: &[u8]) -> Result<()> {
        let header = encode_header_block(body.len());

        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(Error::ConnectionClosed)?;

        write_frame(writer, header.as_bytes(), body).await?;
        tracing::trace!("Sent frame with {} body bytes", body.len());
        Ok(())
    }

    /// Shut down the output stream.
    ///
    /// Later sends fail with [`Error::ConnectionClosed`]. Calling this more
    /// than once is a no-op.
    pub async fn shutdown(&self) -> Result<()> {
        let writer = self.writer.lock().await.take();
        if let Some(mut writer) = writer {
            tracing::debug!("Shutting down output stream");
            writer.shutdown().await?;
        }
        Ok(())
    }

    /// True once [`shutdown`](Self::shutdown) has been called.
    pub async fn is_shut_down(&self) -> bool {
        self.writer.lock().await.is_none()
    }
}

/// Write header and body with vectored I/O, then flush.
///
/// The first `write_vectored` usually takes the whole frame; partial writes
/// continue from where the previous call stopped.
async fn write_frame<W>(writer: &mut W, header: &[u8], body: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let total = header.len() + body.len();
    let mut written = 0;

    while written < total {
        let n = if written < header.len() {
            let slices = [IoSlice::new(&header[written..]), IoSlice::new(body)];
            writer.write_vectored(&slices).await?
        } else {
            writer.write(&body[written - header.len()..]).await?
        };

        if n == 0 {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                "write returned 0",
            )));
        }
        written += n;
    }

    writer.flush().await?;
    Ok(())
}
