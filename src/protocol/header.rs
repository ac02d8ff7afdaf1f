//! Header block parsing and encoding.
//!
//! A header block is a run of `Key: Value` lines, each terminated by `\r\n`,
//! closed by an empty line:
//!
//! ```text
//! Content-Length: 87\r\n
//! \r\n
//! ```
//!
//! Header names are matched case-insensitively on lookup but stored as sent.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Header carrying the body length in bytes.
pub const CONTENT_LENGTH: &str = "Content-Length";

/// Header announcing the protocol version in the handshake block.
pub const PROTOCOL_VERSION: &str = "Protocol-Version";

/// Line terminator used by every header line.
pub const LINE_END: &[u8] = b"\r\n";

/// Sequence that closes a non-empty header block.
pub const BLOCK_END: &[u8] = b"\r\n\r\n";

/// Default limit for a single header block (8 KiB).
pub const DEFAULT_MAX_HEADER_SIZE: usize = 8 * 1024;

/// Default limit for a single body (64 MiB).
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 64 * 1024 * 1024;

/// Parsed header map. Insertion order is not preserved.
pub type Headers = HashMap<String, String>;

/// Find the end of the header block at the start of `buf`.
///
/// Returns the number of bytes up to and including the terminating blank
/// line, or `None` if the block is not complete yet. `scanned` is the length
/// of `buf` at the previous unsuccessful call; the search resumes just before
/// it so a terminator split across pushes is still found.
pub fn find_block_end(buf: &[u8], scanned: usize) -> Option<usize> {
    // Block with no header lines at all.
    if buf.starts_with(LINE_END) {
        return Some(LINE_END.len());
    }

    let start = scanned.saturating_sub(BLOCK_END.len() - 1);
    buf.get(start..)?
        .windows(BLOCK_END.len())
        .position(|window| window == BLOCK_END)
        .map(|pos| start + pos + BLOCK_END.len())
}

/// Parse a complete header block (including its terminating blank line).
///
/// # Errors
///
/// Returns [`Error::Framing`] if a line is not valid UTF-8, has no `:`
/// separator or has an empty name, or if a name repeats (ignoring case).
pub fn parse_header_block(block: &[u8]) -> Result<Headers> {
    let mut headers = Headers::new();
    let mut rest = block;

    while let Some(pos) = find_line_end(rest) {
        let line = &rest[..pos];
        rest = &rest[pos + LINE_END.len()..];

        if line.is_empty() {
            break;
        }

        let (name, value) = parse_header_line(line)?;
        if headers.keys().any(|key| key.eq_ignore_ascii_case(&name)) {
            return Err(Error::Framing(format!("repeated header {:?}", name)));
        }
        headers.insert(name, value);
    }

    Ok(headers)
}

/// Split one `Key: Value` line. Leading whitespace of the value is dropped.
fn parse_header_line(line: &[u8]) -> Result<(String, String)> {
    let text = std::str::from_utf8(line)
        .map_err(|e| Error::Framing(format!("header line is not valid UTF-8: {}", e)))?;

    let (name, value) = text
        .split_once(':')
        .ok_or_else(|| Error::Framing(format!("header line without ':' separator: {:?}", text)))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Framing(format!("header line without a name: {:?}", text)));
    }

    Ok((name.to_string(), value.trim_start().to_string()))
}

#[inline]
fn find_line_end(buf: &[u8]) -> Option<usize> {
    buf.windows(LINE_END.len()).position(|w| w == LINE_END)
}

/// Look up a header value, ignoring the case of the name.
pub fn header_value<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Read the `Content-Length` header.
///
/// Returns `Ok(None)` when the header is absent.
///
/// # Errors
///
/// Returns [`Error::Framing`] unless the value is a run of ASCII digits that
/// fits in `usize`.
pub fn content_length(headers: &Headers) -> Result<Option<usize>> {
    match header_value(headers, CONTENT_LENGTH) {
        None => Ok(None),
        Some(raw) => {
            let digits = raw.trim();
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::Framing(format!("invalid Content-Length value: {:?}", raw)));
            }
            digits
                .parse::<usize>()
                .map(Some)
                .map_err(|_| Error::Framing(format!("invalid Content-Length value: {:?}", raw)))
        }
    }
}

/// Encode the header block for a body of `content_length` bytes.
///
/// # Example
///
/// ```
/// use v8debug_client::protocol::encode_header_block;
///
/// assert_eq!(encode_header_block(87), "Content-Length: 87\r\n\r\n");
/// ```
pub fn encode_header_block(content_length: usize) -> String {
    format!("{}: {}\r\n\r\n", CONTENT_LENGTH, content_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_block_end_complete() {
        let buf = b"Content-Length: 2\r\n\r\n{}";
        assert_eq!(find_block_end(buf, 0), Some(buf.len() - 2));
    }

    #[test]
    fn test_find_block_end_incomplete() {
        assert_eq!(find_block_end(b"Content-Length: 2\r\n", 0), None);
        assert_eq!(find_block_end(b"Content-Len", 0), None);
        assert_eq!(find_block_end(b"", 0), None);
        assert_eq!(find_block_end(b"\r", 0), None);
    }

    #[test]
    fn test_find_block_end_empty_block() {
        assert_eq!(find_block_end(b"\r\nrest", 0), Some(2));
    }

    #[test]
    fn test_find_block_end_resumes_across_split_terminator() {
        let full = b"A: b\r\n\r\n";
        // Previous scan saw "A: b\r\n\r" and found nothing.
        assert_eq!(find_block_end(&full[..7], 0), None);
        assert_eq!(find_block_end(full, 7), Some(full.len()));
    }

    #[test]
    fn test_find_block_end_scanned_past_len() {
        assert_eq!(find_block_end(b"A: b", 100), None);
    }

    #[test]
    fn test_parse_single_header() {
        let headers = parse_header_block(b"Content-Length: 87\r\n\r\n").unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["Content-Length"], "87");
    }

    #[test]
    fn test_parse_handshake_block() {
        let block = b"Type: connect\r\nV8-Version: 3.14.5.9\r\nProtocol-Version: 1\r\nEmbedding-Host: node v0.10.36\r\nContent-Length: 0\r\n\r\n";
        let headers = parse_header_block(block).unwrap();

        assert_eq!(headers.len(), 5);
        assert_eq!(headers["Type"], "connect");
        assert_eq!(headers["Protocol-Version"], "1");
        assert_eq!(headers["Embedding-Host"], "node v0.10.36");
    }

    #[test]
    fn test_parse_value_keeps_inner_colons_and_spaces() {
        let headers = parse_header_block(b"Host: a:b  c\r\n\r\n").unwrap();
        assert_eq!(headers["Host"], "a:b  c");
    }

    #[test]
    fn test_parse_empty_value() {
        let headers = parse_header_block(b"Empty:\r\n\r\n").unwrap();
        assert_eq!(headers["Empty"], "");
    }

    #[test]
    fn test_parse_line_without_separator() {
        let err = parse_header_block(b"garbage\r\n\r\n").unwrap_err();
        assert!(matches!(err, Error::Framing(_)));
        assert!(err.to_string().contains("separator"));
    }

    #[test]
    fn test_parse_line_without_name() {
        let err = parse_header_block(b": 5\r\n\r\n").unwrap_err();
        assert!(matches!(err, Error::Framing(_)));
    }

    #[test]
    fn test_parse_invalid_utf8_line() {
        let err = parse_header_block(b"Name: \xff\xfe\r\n\r\n").unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_content_length_lookup() {
        let headers = parse_header_block(b"content-length: 12\r\n\r\n").unwrap();
        assert_eq!(content_length(&headers).unwrap(), Some(12));

        let headers = parse_header_block(b"Protocol-Version: 1\r\n\r\n").unwrap();
        assert_eq!(content_length(&headers).unwrap(), None);
    }

    #[test]
    fn test_content_length_not_numeric() {
        let headers = parse_header_block(b"Content-Length: twelve\r\n\r\n").unwrap();
        let err = content_length(&headers).unwrap_err();
        assert!(err.to_string().contains("invalid Content-Length"));

        let headers = parse_header_block(b"Content-Length: -1\r\n\r\n").unwrap();
        assert!(content_length(&headers).is_err());
    }

    #[test]
    fn test_content_length_rejects_sign_and_empty() {
        for raw in ["+2", "", " ", "2 3", "0x10", "99999999999999999999999"] {
            let mut headers = Headers::new();
            headers.insert(CONTENT_LENGTH.to_string(), raw.to_string());
            assert!(
                matches!(content_length(&headers), Err(Error::Framing(_))),
                "accepted {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_parse_repeated_header_ignoring_case() {
        let err = parse_header_block(b"Content-Length: 2\r\ncontent-length: 3\r\n\r\n").unwrap_err();
        assert!(matches!(err, Error::Framing(ref msg) if msg.contains("repeated")));

        let err = parse_header_block(b"Type: a\r\nType: a\r\n\r\n").unwrap_err();
        assert!(matches!(err, Error::Framing(_)));
    }

    #[test]
    fn test_header_value_case_insensitive() {
        let headers = parse_header_block(b"PROTOCOL-VERSION: 1\r\n\r\n").unwrap();
        assert_eq!(header_value(&headers, PROTOCOL_VERSION), Some("1"));
        assert_eq!(header_value(&headers, "missing"), None);
    }

    #[test]
    fn test_encode_header_block_parses_back() {
        let encoded = encode_header_block(1234);
        let end = find_block_end(encoded.as_bytes(), 0).unwrap();
        assert_eq!(end, encoded.len());

        let headers = parse_header_block(encoded.as_bytes()).unwrap();
        assert_eq!(content_length(&headers).unwrap(), Some(1234));
    }
}
