//! Protocol module - header blocks, framing, and frame types.
//!
//! This module implements the V8 debugger transport framing:
//! - `Key: Value\r\n` header blocks closed by an empty line
//! - a one-time handshake block (`Protocol-Version: 1`)
//! - `Content-Length` delimited JSON bodies
//! - a frame reader for accumulating partial reads

mod frame;
mod frame_reader;
mod header;

pub use frame::{build_frame, Block, Frame};
pub use frame_reader::FrameReader;
pub use header::{
    content_length, encode_header_block, find_block_end, header_value, parse_header_block,
    Headers, BLOCK_END, CONTENT_LENGTH, DEFAULT_MAX_CONTENT_LENGTH, DEFAULT_MAX_HEADER_SIZE,
    LINE_END, PROTOCOL_VERSION,
};
