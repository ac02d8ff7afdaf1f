//! Outbound request envelope and per-connection sequence numbers.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde_json::Value;

/// Request envelope sent to the debuggee.
///
/// ```
/// use v8debug_client::message::Request;
///
/// let request = Request::new(1, "continue", None);
/// let json = serde_json::to_string(&request).unwrap();
/// assert_eq!(json, r#"{"seq":1,"type":"request","command":"continue"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    /// Sequence number, echoed back as `request_seq` in the response.
    pub seq: u64,
    #[serde(rename = "type")]
    kind: &'static str,
    /// Command name (e.g. `"backtrace"`).
    pub command: String,
    /// Command-specific arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

impl Request {
    /// Create a new request.
    pub fn new(seq: u64, command: impl Into<String>, arguments: Option<Value>) -> Self {
        Self {
            seq,
            kind: "request",
            command: command.into(),
            arguments,
        }
    }
}

/// Monotonic sequence numbers for outbound requests.
///
/// One generator belongs to one connection; numbering starts at 1.
#[derive(Debug)]
pub struct SequenceGenerator {
    next: AtomicU64,
}

impl SequenceGenerator {
    /// Create a generator whose first value is 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a generator whose first value is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Take the next sequence number.
    #[inline]
    pub fn next_seq(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}
