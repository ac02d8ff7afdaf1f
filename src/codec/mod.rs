//! Codec module - serialization/deserialization for frame bodies.
//!
//! Frame bodies are UTF-8 JSON. [`JsonCodec`] turns a body into a
//! [`ParsedMessage`](crate::message::ParsedMessage) and serializes outbound
//! commands.
//!
//! # Design
//!
//! Codecs are marker structs with static methods rather than trait objects.
//! Decoding never sees a partial body: the frame reader hands over complete
//! `Content-Length` byte ranges only.

mod json;

pub use json::JsonCodec;
