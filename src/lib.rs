//! # v8debug-client
//!
//! Client side of the V8 debugger wire protocol.
//!
//! The debug agent speaks a header-plus-length framed stream: a one-time
//! handshake block (`Protocol-Version: 1\r\n\r\n`), then messages of the form
//! `Content-Length: N\r\n\r\n` followed by `N` bytes of UTF-8 JSON. This crate
//! reassembles frames from arbitrarily chunked reads, decodes them into
//! responses and events, and frames outbound commands the same way.
//!
//! ## Architecture
//!
//! - **Input** ([`Connection`]): owns the read half, runs the read loop and
//!   calls a [`Listener`] for every handshake, response and event, in wire order
//! - **Output** ([`CommandSender`]): cloneable, serializes commands and writes
//!   one whole frame per lock acquisition
//!
//! ## Example
//!
//! ```ignore
//! use v8debug_client::message::{Event, Response};
//! use v8debug_client::protocol::Headers;
//! use v8debug_client::{transport, Listener};
//!
//! struct Printer;
//!
//! impl Listener for Printer {
//!     fn header(&mut self, headers: &Headers) {}
//!     fn response(&mut self, response: Response) {
//!         println!("{}: {}", response.command, response.success);
//!     }
//!     fn event(&mut self, event: Event) {
//!         println!("event {}", event.name);
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> v8debug_client::Result<()> {
//!     let (connection, sender) = transport::connect("127.0.0.1:5858").await?;
//!     let close = connection.close_handle();
//!     let task = connection.spawn(Printer);
//!
//!     sender.send_request("version", None).await?;
//!     sender.send_request("continue", None).await?;
//!
//!     close.close();
//!     let (_printer, result) = task.await.expect("read task panicked");
//!     result
//! }
//! ```

pub mod codec;
pub mod error;
pub mod message;
pub mod protocol;
pub mod transport;

mod connection;
mod listener;
mod writer;

pub use connection::{CloseHandle, Connection, ConnectionBuilder, DEFAULT_READ_BUFFER_SIZE};
pub use error::{DecodeError, Error, Result};
pub use listener::Listener;
pub use writer::CommandSender;
