//! JSON-RPC request and response value types
//!
//! This module holds the value objects that flow through a call: the [`Request`]
//! a caller wants to make and the [`Response`] the server produced for it. Both
//! are immutable once built; their fields are private and only readable through
//! accessors, so the invariants checked at construction cannot be broken later.
//!
//! # Wire Shape
//!
//! The client speaks the JSON-RPC 1.0-style shape:
//!
//! - **Request**: `{"method": "...", "params": [...] | {...}, "id": ...}`
//! - **Notification**: the same object without an `id`
//! - **Success response**: `{"result": ..., "id": ...}`
//! - **Error response**: `{"error": {"code": ..., "message": ...}, "id": ...}`
//!
//! There is no `jsonrpc` version member on outgoing requests.
//!
//! # Request IDs
//!
//! IDs correlate a request with its response. A request without an ID (or with
//! a null ID) is a notification and never gets a reply slot.

use crate::error::{Error, Result, RpcErrorData};
use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON-RPC request ID
///
/// An ID can be a string, an integer, or null. Null is only meaningful on
/// responses, where it marks a reply the server could not attribute to any
/// request.
///
/// # Implementation Notes
///
/// This enum uses `#[serde(untagged)]` so it serializes as the bare inner value.
/// It implements `Hash` and `Eq` so IDs can key the batch correlation map.
///
/// # Examples
///
/// ```rust
/// use jrhttp_core::Id;
///
/// let id1: Id = "req-123".into();
/// let id2: Id = 42i64.into();
///
/// assert_eq!(id1.to_string(), "\"req-123\"");
/// assert_eq!(id2.to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// String identifier
    String(String),
    /// Integer identifier, what the client generates for its own calls
    Number(i64),
    /// Null identifier
    Null,
}

impl Id {
    /// Returns true for `Id::Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Id::Null)
    }

    /// Read an ID out of a raw JSON value
    ///
    /// Accepts strings, integers that fit in `i64`, and null. Anything else
    /// (floats, objects, arrays, booleans) is a decoding error, since it could
    /// never compare equal to an ID this client sent.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        Id::deserialize(value).map_err(|e| Error::Decoding {
            message: format!("invalid id: {}", e),
            raw: value.to_string(),
        })
    }
}

impl fmt::Display for Id {
    /// Renders the id as it appears on the wire, string ids quoted and escaped
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::String(s) => write!(f, "{}", serde_json::Value::from(s.as_str())),
            Id::Number(n) => write!(f, "{}", n),
            Id::Null => write!(f, "null"),
        }
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl TryFrom<u64> for Id {
    type Error = std::num::TryFromIntError;

    /// Fails for values above `i64::MAX`, which JSON-RPC ids here cannot hold
    fn try_from(n: u64) -> std::result::Result<Self, Self::Error> {
        i64::try_from(n).map(Id::Number)
    }
}

/// A call to make on the remote server
///
/// A request carries the method name, its parameters (a JSON array or object)
/// and an optional ID. With an ID the server is expected to reply; without one
/// the request is a notification.
///
/// # Normalisation
///
/// - `params` of `null` become an empty array
/// - `id` of `Id::Null` becomes "no id", so a null ID always means notification
///
/// # Examples
///
/// ```rust
/// use jrhttp_core::{Id, Request};
/// use serde_json::json;
///
/// let call = Request::call("sum", json!([2, 3]), 1i64).unwrap();
/// assert_eq!(call.id(), Some(&Id::Number(1)));
///
/// let note = Request::notification("log", json!({"line": "hello"})).unwrap();
/// assert!(note.is_notification());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    method: String,
    params: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Id>,
}

impl Request {
    /// Build a request, validating method and params
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRequest` when the method is empty or the params
    /// are a scalar (string, number, boolean).
    pub fn new(
        method: impl Into<String>,
        params: serde_json::Value,
        id: Option<Id>,
    ) -> Result<Self> {
        let method = method.into();
        if method.is_empty() {
            return Err(Error::InvalidRequest("method name cannot be empty".into()));
        }

        let params = match params {
            serde_json::Value::Null => serde_json::Value::Array(Vec::new()),
            p @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => p,
            other => {
                return Err(Error::InvalidRequest(format!(
                    "params must be an array or an object, got {}",
                    other
                )))
            }
        };

        let id = id.filter(|id| !id.is_null());

        Ok(Self { method, params, id })
    }

    /// Build a request that expects a response
    pub fn call(
        method: impl Into<String>,
        params: serde_json::Value,
        id: impl Into<Id>,
    ) -> Result<Self> {
        Self::new(method, params, Some(id.into()))
    }

    /// Build a notification (no id, no response)
    pub fn notification(method: impl Into<String>, params: serde_json::Value) -> Result<Self> {
        Self::new(method, params, None)
    }

    /// Build a request from any serializable parameter value
    ///
    /// # Errors
    ///
    /// Returns `Error::Encoding` if `params` cannot be represented as JSON,
    /// otherwise the same errors as [`Request::new`].
    pub fn from_serialize<P>(method: impl Into<String>, params: &P, id: Option<Id>) -> Result<Self>
    where
        P: Serialize + ?Sized,
    {
        let params = serde_json::to_value(params).map_err(|e| Error::Encoding(e.to_string()))?;
        Self::new(method, params, id)
    }

    /// Name of the remote procedure
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Parameters, always an array or an object
    pub fn params(&self) -> &serde_json::Value {
        &self.params
    }

    /// Request ID, `None` for notifications
    pub fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    /// True if this request expects no response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

impl<'de> Deserialize<'de> for Request {
    /// Deserialize through [`Request::new`] so decoded requests obey the same
    /// rules as constructed ones.
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            method: String,
            #[serde(default)]
            params: serde_json::Value,
            #[serde(default)]
            id: Option<Id>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Request::new(raw.method, raw.params, raw.id).map_err(serde::de::Error::custom)
    }
}

/// The outcome of one remote call
///
/// A response holds exactly one of a `result` value or an `error` object.
/// The two constructors are the only way to build one, which keeps that
/// invariant true for every value of this type.
///
/// Server-reported errors are data, not failures of the call: the client hands
/// them back as a `Response` and leaves the decision to the caller.
///
/// # Examples
///
/// ```rust
/// use jrhttp_core::{Id, Response, RpcErrorData};
/// use serde_json::json;
///
/// let ok = Response::success(json!(5), Id::Number(1));
/// assert_eq!(ok.result(), Some(&json!(5)));
///
/// let failed = Response::error(RpcErrorData::new(-32601, "no such method"), Id::Number(2));
/// assert_eq!(failed.error_code(), Some(-32601));
/// assert!(failed.result().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    outcome: Outcome,
    id: Id,
}

#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Result(serde_json::Value),
    Error(RpcErrorData),
}

impl Response {
    /// Create a successful response
    pub fn success(result: serde_json::Value, id: Id) -> Self {
        Self {
            outcome: Outcome::Result(result),
            id,
        }
    }

    /// Create an error response
    pub fn error(error: RpcErrorData, id: Id) -> Self {
        Self {
            outcome: Outcome::Error(error),
            id,
        }
    }

    /// ID echoed by the server
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Result value, `None` for error responses
    pub fn result(&self) -> Option<&serde_json::Value> {
        match &self.outcome {
            Outcome::Result(value) => Some(value),
            Outcome::Error(_) => None,
        }
    }

    /// Error object, `None` for successful responses
    pub fn error_data(&self) -> Option<&RpcErrorData> {
        match &self.outcome {
            Outcome::Result(_) => None,
            Outcome::Error(error) => Some(error),
        }
    }

    /// Server error code, if the call failed
    pub fn error_code(&self) -> Option<i64> {
        self.error_data().map(|e| e.code)
    }

    /// Server error message, if the call failed
    pub fn error_message(&self) -> Option<&str> {
        self.error_data().map(|e| e.message.as_str())
    }

    /// True if the response carries a result
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Result(_))
    }

    /// True if the response carries an error
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }

    /// Split into the result or the server error
    pub fn into_result(self) -> std::result::Result<serde_json::Value, RpcErrorData> {
        match self.outcome {
            Outcome::Result(value) => Ok(value),
            Outcome::Error(error) => Err(error),
        }
    }

    /// Render the response in its wire shape
    pub fn to_value(&self) -> serde_json::Value {
        match &self.outcome {
            Outcome::Result(result) => serde_json::json!({ "result": result, "id": self.id }),
            Outcome::Error(error) => serde_json::json!({ "error": error, "id": self.id }),
        }
    }
}
