//! Transport module - connecting to the debug agent.
//!
//! Provides:
//! - TCP connection to a V8 debug agent
//! - Splitting an arbitrary duplex stream into a [`Connection`](crate::Connection)
//!   and a [`CommandSender`](crate::CommandSender)

mod tcp;

pub use tcp::{connect, connect_with, split, split_with, DEFAULT_DEBUG_PORT};
