//! Message module - decoded V8 debugger messages.
//!
//! Every frame body is a JSON object with a `type` field. Inbound messages
//! are classified into a [`ParsedMessage`]:
//!
//! | `type`       | Variant                        |
//! |--------------|--------------------------------|
//! | `"response"` | [`ParsedMessage::Response`]    |
//! | `"event"`    | [`ParsedMessage::Event`]       |
//! | *(other)*    | [`ParsedMessage::Unknown`]     |
//!
//! Outbound commands use the [`Request`] envelope.

mod event;
mod request;

use serde::Deserialize;
use serde_json::Value;

pub use event::{BreakEventBody, CompileEventBody, EventBody, ExceptionEventBody, ScriptInfo};
pub use request::{Request, SequenceGenerator};

/// A classified inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedMessage {
    /// Reply to a previously sent request.
    Response(Response),
    /// Unsolicited notification from the debuggee.
    Event(Event),
    /// Well-formed JSON with an unrecognized `type`.
    Unknown(Value),
}

impl ParsedMessage {
    /// Sequence number of the message, if it carries one.
    pub fn seq(&self) -> Option<u64> {
        match self {
            ParsedMessage::Response(response) => Some(response.seq),
            ParsedMessage::Event(event) => Some(event.seq),
            ParsedMessage::Unknown(value) => value.get("seq").and_then(Value::as_u64),
        }
    }
}

/// Response to a request.
///
/// `request_seq` matches the `seq` of the [`Request`] it answers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Response {
    /// Sequence number of this message.
    pub seq: u64,
    /// Sequence number of the request being answered.
    #[serde(default)]
    pub request_seq: u64,
    /// Command name echoed back (e.g. `"continue"`).
    #[serde(default)]
    pub command: String,
    /// Whether the command succeeded.
    pub success: bool,
    /// Whether the debuggee is running after the command.
    #[serde(default)]
    pub running: bool,
    /// Error message when `success` is false.
    #[serde(default)]
    pub message: Option<String>,
    /// Command-specific result.
    #[serde(default)]
    pub body: Option<Value>,
}

/// Event notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Sequence number of this message.
    pub seq: u64,
    /// Event name as sent on the wire (e.g. `"break"`).
    pub name: String,
    /// Body refined by event name.
    pub body: EventBody,
}

/// Wire shape of an event before its body is refined.
#[derive(Debug, Deserialize)]
pub(crate) struct EventEnvelope {
    pub seq: u64,
    pub event: String,
    #[serde(default)]
    pub body: Value,
}

impl Event {
    /// Build an event from its name and raw JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is a known event but the body does not
    /// have the expected shape.
    pub fn from_parts(seq: u64, name: String, body: Value) -> Result<Self, serde_json::Error> {
        let body = EventBody::from_json(&name, body)?;
        Ok(Self { seq, name, body })
    }
}
