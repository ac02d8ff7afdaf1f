//! Stream setup for debugger connections.
//!
//! The V8 debug agent listens on TCP (node's `--debug=<port>`, 5858 by
//! default). [`connect`] dials it; [`split`] works for any duplex stream.
//!
//! # Example
//!
//! ```ignore
//! use v8debug_client::transport;
//!
//! let (connection, sender) = transport::connect("127.0.0.1:5858").await?;
//! let task = connection.spawn(MyListener::default());
//! sender.send_request("version", None).await?;
//! ```

use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::connection::{Connection, ConnectionBuilder};
use crate::error::Result;
use crate::writer::CommandSender;

/// Default port of the V8 debug agent.
pub const DEFAULT_DEBUG_PORT: u16 = 5858;

/// Connect to a debug agent over TCP with default settings.
pub async fn connect<A: ToSocketAddrs>(
    addr: A,
) -> Result<(Connection<OwnedReadHalf>, CommandSender<OwnedWriteHalf>)> {
    connect_with(addr, ConnectionBuilder::new()).await
}

/// Connect to a debug agent over TCP with a configured builder.
pub async fn connect_with<A: ToSocketAddrs>(
    addr: A,
    builder: ConnectionBuilder,
) -> Result<(Connection<OwnedReadHalf>, CommandSender<OwnedWriteHalf>)> {
    let stream = TcpStream::connect(addr).await?;
    stream.set_nodelay(true)?;

    if let Ok(peer) = stream.peer_addr() {
        tracing::debug!("Connected to debug agent at {}", peer);
    }

    let (reader, writer) = stream.into_split();
    Ok((builder.build(reader), CommandSender::new(writer)))
}

/// Split any duplex stream into a connection and a command sender.
pub fn split<S>(stream: S) -> (Connection<ReadHalf<S>>, CommandSender<WriteHalf<S>>)
where
    S: AsyncRead + AsyncWrite,
{
    split_with(stream, ConnectionBuilder::new())
}

/// Split any duplex stream with a configured builder.
pub fn split_with<S>(
    stream: S,
    builder: ConnectionBuilder,
) -> (Connection<ReadHalf<S>>, CommandSender<WriteHalf<S>>)
where
    S: AsyncRead + AsyncWrite,
{
    let (reader, writer) = tokio::io::split(stream);
    (builder.build(reader), CommandSender::new(writer))
}
