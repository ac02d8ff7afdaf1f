//! JSON codec for frame bodies.
//!
//! Bodies are UTF-8 JSON. `Content-Length` counts encoded bytes, so a body is
//! only decoded once the frame reader has buffered all of it; a multi-byte
//! sequence split across socket reads is whole by the time it gets here.
//!
//! # Example
//!
//! ```
//! use v8debug_client::codec::JsonCodec;
//! use v8debug_client::message::ParsedMessage;
//!
//! let body = br#"{"seq":18,"request_seq":1,"type":"response","command":"continue","success":true,"running":true}"#;
//! match JsonCodec::decode(body).unwrap() {
//!     ParsedMessage::Response(response) => assert_eq!(response.command, "continue"),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

use serde_json::Value;

use crate::error::{DecodeError, Result};
use crate::message::{Event, EventEnvelope, ParsedMessage};

/// JSON codec for message bodies.
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a value to JSON bytes.
    ///
    /// Non-ASCII characters are written as raw UTF-8, not `\u` escapes.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    /// Decode and classify a frame body.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the body is not UTF-8, not JSON, or is a
    /// response/event without the required fields.
    pub fn decode(body: &[u8]) -> std::result::Result<ParsedMessage, DecodeError> {
        let text = std::str::from_utf8(body)?;
        let value: Value = serde_json::from_str(text).map_err(DecodeError::InvalidJson)?;
        Self::classify(value)
    }

    /// Classify an already parsed JSON value by its `type` field.
    pub fn classify(value: Value) -> std::result::Result<ParsedMessage, DecodeError> {
        match value.get("type").and_then(Value::as_str) {
            Some("response") => serde_json::from_value(value)
                .map(ParsedMessage::Response)
                .map_err(|source| DecodeError::Shape {
                    kind: "response",
                    source,
                }),
            Some("event") => {
                let envelope: EventEnvelope =
                    serde_json::from_value(value).map_err(|source| DecodeError::Shape {
                        kind: "event",
                        source,
                    })?;
                Event::from_parts(envelope.seq, envelope.event, envelope.body)
                    .map(ParsedMessage::Event)
                    .map_err(|source| DecodeError::Shape {
                        kind: "event body",
                        source,
                    })
            }
            _ => Ok(ParsedMessage::Unknown(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::EventBody;
    use serde_json::json;

    #[test]
    fn test_decode_continue_response() {
        let body = br#"{"seq":18,"request_seq":1,"type":"response","command":"continue","success":true,"running":true}"#;
        assert_eq!(body.len(), 95);

        let ParsedMessage::Response(response) = JsonCodec::decode(body).unwrap() else {
            panic!("expected response");
        };

        assert_eq!(response.seq, 18);
        assert_eq!(response.request_seq, 1);
        assert_eq!(response.command, "continue");
        assert!(response.success);
        assert!(response.running);
        assert_eq!(response.message, None);
        assert_eq!(response.body, None);
    }

    #[test]
    fn test_decode_failed_response() {
        let body = br#"{"seq":5,"request_seq":4,"type":"response","command":"lookup","success":false,"message":"Object not found","running":false}"#;

        let ParsedMessage::Response(response) = JsonCodec::decode(body).unwrap() else {
            panic!("expected response");
        };

        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Object not found"));
    }

    #[test]
    fn test_decode_response_with_body() {
        let body = br#"{"seq":9,"request_seq":8,"type":"response","command":"version","success":true,"running":false,"body":{"V8Version":"3.14.5.9"}}"#;

        let ParsedMessage::Response(response) = JsonCodec::decode(body).unwrap() else {
            panic!("expected response");
        };

        assert_eq!(response.body, Some(json!({ "V8Version": "3.14.5.9" })));
    }

    #[test]
    fn test_decode_break_event() {
        let body = br#"{"seq":3,"type":"event","event":"break","body":{"invocationText":"f()","sourceLine":51,"sourceColumn":4,"sourceLineText":"    vars();","script":{"id":40,"name":"t.js","lineOffset":0,"columnOffset":0,"lineCount":244},"breakpoints":[2]}}"#;

        let ParsedMessage::Event(event) = JsonCodec::decode(body).unwrap() else {
            panic!("expected event");
        };

        assert_eq!(event.seq, 3);
        assert_eq!(event.name, "break");
        match event.body {
            EventBody::Break(body) => {
                assert_eq!(body.source_line, 51);
                assert_eq!(body.source_line_text, "    vars();");
                assert_eq!(body.breakpoints, vec![2]);
            }
            other => panic!("expected break body, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_event_without_body() {
        let body = br#"{"seq":7,"type":"event","event":"scriptCollected"}"#;

        let ParsedMessage::Event(event) = JsonCodec::decode(body).unwrap() else {
            panic!("expected event");
        };

        assert_eq!(event.body, EventBody::Other(Value::Null));
    }

    #[test]
    fn test_decode_unknown_type() {
        let body = br#"{"seq":1,"type":"request","command":"continue"}"#;

        let parsed = JsonCodec::decode(body).unwrap();

        assert_eq!(parsed.seq(), Some(1));
        assert!(matches!(parsed, ParsedMessage::Unknown(ref v) if v["command"] == "continue"));
    }

    #[test]
    fn test_decode_missing_type_is_unknown() {
        let parsed = JsonCodec::decode(b"[1,2,3]").unwrap();
        assert_eq!(parsed, ParsedMessage::Unknown(json!([1, 2, 3])));
    }

    #[test]
    fn test_decode_malformed_json() {
        let err = JsonCodec::decode(b"{\"seq\":").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidJson(_)));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let err = JsonCodec::decode(b"{\"a\":\"\xc3\"}").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidUtf8(_)));
    }

    #[test]
    fn test_decode_response_without_success() {
        let err = JsonCodec::decode(br#"{"seq":1,"type":"response","command":"x"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Shape { kind: "response", .. }));
    }

    #[test]
    fn test_decode_break_event_with_bad_body() {
        let err =
            JsonCodec::decode(br#"{"seq":1,"type":"event","event":"break","body":"nope"}"#)
                .unwrap_err();
        assert!(matches!(err, DecodeError::Shape { kind: "event body", .. }));
    }

    #[test]
    fn test_decode_preserves_non_ascii() {
        let text = "\u{e9}\u{4e2d}\u{1F680}\u{10FFFF}";
        let body = format!(
            r#"{{"seq":1,"type":"event","event":"output","body":{{"text":"{}"}}}}"#,
            text
        );

        let ParsedMessage::Event(event) = JsonCodec::decode(body.as_bytes()).unwrap() else {
            panic!("expected event");
        };

        assert_eq!(event.body, EventBody::Other(json!({ "text": text })));
    }

    #[test]
    fn test_encode_writes_raw_utf8() {
        let encoded = JsonCodec::encode(&json!({ "expression": "\u{e9}" })).unwrap();
        assert_eq!(encoded, "{\"expression\":\"\u{e9}\"}".as_bytes());
    }
}
