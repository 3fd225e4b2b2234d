//! HTTP/1.0 framing by hand
//!
//! The client does not use an HTTP library. It writes the request line and
//! headers itself and, on the way back, cuts the status line and headers off
//! the raw bytes it read until the server closed the connection.
//!
//! # Request Layout
//!
//! ```text
//! POST /path HTTP/1.0\r\n
//! Host: example.com:8080\r\n
//! Content-Type: application/json\r\n
//! Authorization: Basic ...\r\n        (only when configured)
//! Content-Length: 42\r\n
//! Connection: close\r\n
//! \r\n
//! {"method":"...","params":[...],"id":1}
//! ```
//!
//! # Envelope Stripping
//!
//! The body starts after the first `\r\n\r\n`. Some servers send replies
//! without a clean separator; for those the last non-empty line of the reply
//! is taken as the body. That fallback is a deliberate leniency: it can turn a
//! truncated or malformed reply into something that looks like a body, and the
//! JSON decoder is what catches it when it is not.

use crate::target::Target;

const SEPARATOR: &[u8] = b"\r\n\r\n";

/// Build the full request: request line, headers, blank line, body
pub fn build_request(target: &Target, auth_header: Option<&str>, body: &[u8]) -> Vec<u8> {
    let mut head = format!(
        "POST {} HTTP/1.0\r\nHost: {}\r\nContent-Type: application/json\r\n",
        target.path(),
        target.host_header()
    );
    if let Some(auth) = auth_header {
        head.push_str("Authorization: ");
        head.push_str(auth);
        head.push_str("\r\n");
    }
    head.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    ));

    let mut request = Vec::with_capacity(head.len() + body.len());
    request.extend_from_slice(head.as_bytes());
    request.extend_from_slice(body);
    request
}

/// Return the body of a raw HTTP reply
///
/// Everything after the first `\r\n\r\n`; if there is none, the last non-empty
/// line with surrounding whitespace trimmed. A reply with no non-empty line
/// yields an empty body.
pub fn strip_envelope(raw: &[u8]) -> &[u8] {
    if let Some(pos) = find_separator(raw) {
        return &raw[pos + SEPARATOR.len()..];
    }

    tracing::debug!(
        reply_len = raw.len(),
        "No header separator in reply, using last non-empty line"
    );

    raw.split(|&b| b == b'\n')
        .rev()
        .map(|line| line.trim_ascii())
        .find(|line| !line.is_empty())
        .unwrap_or(&[])
}

/// Parse the status code from the status line, if there is one
pub fn status_code(raw: &[u8]) -> Option<u16> {
    let line_end = raw.iter().position(|&b| b == b'\n').unwrap_or(raw.len());
    let line = std::str::from_utf8(&raw[..line_end]).ok()?;
    let mut parts = line.split_whitespace();
    if !parts.next()?.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}

fn find_separator(raw: &[u8]) -> Option<usize> {
    raw.windows(SEPARATOR.len()).position(|w| w == SEPARATOR)
}
