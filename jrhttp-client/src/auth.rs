//! `Authorization` header values
//!
//! The transport attaches whatever header value it is given. This module only
//! provides the common case of HTTP Basic credentials.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Build a Basic `Authorization` header value: `Basic base64(user:pass)`
///
/// # Examples
///
/// ```rust
/// use jrhttp_client::basic_auth_header;
///
/// assert_eq!(basic_auth_header("Aladdin", "open sesame"), "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
/// ```
pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{}:{}", username, password)))
}
