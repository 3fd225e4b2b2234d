//! Error types for jrhttp
//!
//! This module defines the two error shapes the client deals with:
//!
//! - **Error**: failures of a call itself (transport, codec, correlation)
//! - **RpcErrorData**: the `error` object a server puts inside a response
//!
//! # Failures vs Server Errors
//!
//! Every `Error` aborts the call it happened in; nothing is retried and no
//! partial batch result is returned. A server that answers with an `error`
//! object, on the other hand, produced a perfectly valid response: the client
//! returns it as a [`Response`](crate::Response) carrying `RpcErrorData` and
//! does not turn it into an `Error`.
//!
//! # Examples
//!
//! ```rust
//! use jrhttp_core::{Error, Id};
//!
//! let error = Error::MissingResponse(Id::Number(1));
//! assert_eq!(error.kind(), "missing_response");
//! assert!(error.to_string().contains("1"));
//! ```

use crate::types::Id;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Result type for jrhttp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a JSON-RPC call
///
/// # Error Categories
///
/// - **Transport**: Connection, TransportTimeout, Io
/// - **Codec**: Encoding, Decoding
/// - **Correlation**: MismatchedId, MissingResponse, UnexpectedResponse
/// - **Caller mistakes caught before I/O**: InvalidNotify, InvalidRequest, InvalidTarget
/// - **Setup**: Internal
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The TCP connection could not be established
    ///
    /// Covers refused connections, unreachable hosts, DNS failures and a
    /// connect that did not finish within the timeout. `code` is the OS error
    /// code when one is available.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the underlying failure
        message: String,
        /// Raw OS error code, if any
        code: Option<i32>,
    },

    /// Connected, but the reply did not complete before the timeout
    #[error("Transport timed out after {0:?}")]
    TransportTimeout(Duration),

    /// Socket failure after the connection was established
    #[error("IO error: {0}")]
    Io(String),

    /// A payload could not be serialized to JSON
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A reply could not be parsed or did not have a response shape
    ///
    /// `raw` carries the offending text so callers can log or inspect it.
    #[error("Decoding error: {message}")]
    Decoding {
        /// What went wrong
        message: String,
        /// The raw reply text that failed to decode
        raw: String,
    },

    /// A single call was answered with a different id than it was sent with
    #[error("Mismatched response id: expected {expected}, got {actual}")]
    MismatchedId {
        /// ID of the request that was sent
        expected: Id,
        /// ID found in the reply
        actual: Id,
    },

    /// A notification was requested for a request that carries an id
    #[error("Cannot notify with a request id: {0}")]
    InvalidNotify(Id),

    /// A batch reply has no entry for an id that was sent
    #[error("Missing response for id {0}")]
    MissingResponse(Id),

    /// A batch reply carries entries for ids that were never sent
    #[error("Unexpected response ids: {}", format_ids(.0))]
    UnexpectedResponse(Vec<Id>),

    /// The request or batch was rejected before any I/O
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The target address cannot be used
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// Runtime or observability setup failed
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable, low-cardinality label for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Connection { .. } => "connection",
            Error::TransportTimeout(_) => "transport_timeout",
            Error::Io(_) => "io",
            Error::Encoding(_) => "encoding",
            Error::Decoding { .. } => "decoding",
            Error::MismatchedId { .. } => "mismatched_id",
            Error::InvalidNotify(_) => "invalid_notify",
            Error::MissingResponse(_) => "missing_response",
            Error::UnexpectedResponse(_) => "unexpected_response",
            Error::InvalidRequest(_) => "invalid_request",
            Error::InvalidTarget(_) => "invalid_target",
            Error::Internal(_) => "internal",
        }
    }

    /// Build a connection error from an I/O error, keeping the OS code
    pub fn connection(err: &std::io::Error) -> Self {
        Error::Connection {
            message: err.to_string(),
            code: err.raw_os_error(),
        }
    }
}

fn format_ids(ids: &[Id]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error object carried inside a JSON-RPC error response
///
/// Wire shape: `{"code": <int>, "message": <string>, "data"?: <any>}`.
///
/// # Examples
///
/// ```rust
/// use jrhttp_core::RpcErrorData;
///
/// let error = RpcErrorData::new(-32601, "Method not found");
/// assert_eq!(error.to_string(), "[-32601] Method not found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorData {
    /// Numeric error code
    pub code: i64,

    /// Human-readable error message
    pub message: String,

    /// Optional additional error information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcErrorData {
    /// Create an error object with code and message
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create an error object with additional data
    pub fn with_data(code: i64, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl std::fmt::Display for RpcErrorData {
    /// Formats as "[code] message"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for RpcErrorData {}
