//! Wire codec for JSON-RPC payloads
//!
//! This module turns [`Request`] values into the JSON bytes that go on the
//! wire, and turns reply bytes back into [`Response`] values.
//!
//! # Encoding
//!
//! - `encode()` writes one request object: `method`, `params`, and `id`
//!   (omitted for notifications)
//! - `encode_batch()` writes a JSON array of request objects in caller order
//!
//! # Decoding
//!
//! Decoding is split in two steps so each failure has a clear cause:
//!
//! 1. `decode()` parses bytes into a `serde_json::Value`; invalid JSON and a
//!    bare `null` are both decoding errors carrying the raw text
//! 2. `to_response()` shapes that value into a single `Response` or, for an
//!    array, a map of responses keyed by id
//!
//! # Examples
//!
//! ```rust
//! use jrhttp_core::{codec, Decoded, Id, Request};
//! use serde_json::json;
//!
//! let request = Request::call("sum", json!([2, 3]), 1i64).unwrap();
//! let bytes = codec::encode(&request).unwrap();
//! assert_eq!(bytes, br#"{"method":"sum","params":[2,3],"id":1}"#);
//!
//! let reply = codec::decode_response(br#"{"result":5,"id":1}"#).unwrap();
//! match reply {
//!     Decoded::Single(response) => assert_eq!(response.result(), Some(&json!(5))),
//!     Decoded::Batch(_) => unreachable!(),
//! }
//! ```

use crate::error::{Error, Result, RpcErrorData};
use crate::types::{Id, Request, Response};
use serde::Serialize;
use std::collections::HashMap;

/// A decoded reply: one response, or a batch keyed by id
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Reply to a single call
    Single(Response),
    /// Reply to a batch, keyed by each element's id
    Batch(HashMap<Id, Response>),
}

impl Decoded {
    /// True for the batch variant
    pub fn is_batch(&self) -> bool {
        matches!(self, Decoded::Batch(_))
    }

    /// Turn any reply into an id-keyed map
    ///
    /// A single response becomes a one-entry map. Used by batch correlation,
    /// where a server that answers a one-call batch with a bare object is
    /// still judged on the ids it returned.
    pub fn into_map(self) -> HashMap<Id, Response> {
        match self {
            Decoded::Batch(map) => map,
            Decoded::Single(response) => {
                let mut map = HashMap::with_capacity(1);
                map.insert(response.id().clone(), response);
                map
            }
        }
    }
}

fn encode_value<T: Serialize + ?Sized>(msg: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(msg).map_err(|e| Error::Encoding(e.to_string()))
}

/// Encode a single request to JSON bytes
///
/// # Errors
///
/// Returns `Error::Encoding` if serialization fails.
pub fn encode(request: &Request) -> Result<Vec<u8>> {
    encode_value(request)
}

/// Encode several requests as one JSON array, preserving order
pub fn encode_batch(requests: &[Request]) -> Result<Vec<u8>> {
    encode_value(requests)
}

/// Parse raw reply bytes as JSON
///
/// # Errors
///
/// Returns `Error::Decoding` when the bytes are not valid JSON or parse to
/// `null`. The error carries the offending text (lossily converted to UTF-8).
pub fn decode(data: &[u8]) -> Result<serde_json::Value> {
    let value: serde_json::Value = serde_json::from_slice(data).map_err(|e| Error::Decoding {
        message: e.to_string(),
        raw: String::from_utf8_lossy(data).into_owned(),
    })?;

    if value.is_null() {
        return Err(Error::Decoding {
            message: "reply decoded to null".to_string(),
            raw: String::from_utf8_lossy(data).into_owned(),
        });
    }

    Ok(value)
}

/// Shape a decoded JSON value into responses
///
/// - an array becomes [`Decoded::Batch`], each element converted on its own
///   and keyed by its id
/// - an object with a non-null `error` member becomes an error response
/// - any other object becomes a success response, with `result` and `id`
///   defaulting to null when absent
///
/// `"error": null` is how JSON-RPC 1.0 servers mark success, so it is treated
/// as if the member were absent.
///
/// # Errors
///
/// - `Error::Decoding` for scalars, nested arrays, malformed error objects or
///   ids that are not string/integer/null; `1.0` is a float and counts too
/// - `Error::UnexpectedResponse` if a batch reply repeats an id
pub fn to_response(value: serde_json::Value) -> Result<Decoded> {
    match value {
        serde_json::Value::Array(items) => {
            let mut responses = HashMap::with_capacity(items.len());
            for item in items {
                if item.is_array() {
                    return Err(Error::Decoding {
                        message: "nested array in batch reply".to_string(),
                        raw: item.to_string(),
                    });
                }
                let response = object_to_response(item)?;
                let id = response.id().clone();
                if responses.insert(id.clone(), response).is_some() {
                    return Err(Error::UnexpectedResponse(vec![id]));
                }
            }
            Ok(Decoded::Batch(responses))
        }
        other => object_to_response(other).map(Decoded::Single),
    }
}

fn object_to_response(value: serde_json::Value) -> Result<Response> {
    let mut object = match value {
        serde_json::Value::Object(object) => object,
        other => {
            return Err(Error::Decoding {
                message: "reply is not a JSON object".to_string(),
                raw: other.to_string(),
            })
        }
    };

    let id = match object.get("id") {
        Some(raw_id) => Id::from_value(raw_id)?,
        None => Id::Null,
    };

    match object.remove("error") {
        Some(serde_json::Value::Null) | None => {
            let result = object.remove("result").unwrap_or(serde_json::Value::Null);
            Ok(Response::success(result, id))
        }
        Some(error) => {
            let raw = error.to_string();
            let error: RpcErrorData =
                serde_json::from_value(error).map_err(|e| Error::Decoding {
                    message: format!("malformed error object: {}", e),
                    raw,
                })?;
            Ok(Response::error(error, id))
        }
    }
}

/// Parse reply bytes straight into responses
pub fn decode_response(data: &[u8]) -> Result<Decoded> {
    to_response(decode(data)?)
}

/// Parse bytes into a request
///
/// The client never receives requests; this exists for round-trip checks and
/// for test servers that need to read what the client sent.
pub fn decode_request(data: &[u8]) -> Result<Request> {
    let value = decode(data)?;
    serde_json::from_value(value).map_err(|e| Error::Decoding {
        message: e.to_string(),
        raw: String::from_utf8_lossy(data).into_owned(),
    })
}

/// Parse bytes into a list of requests (a batch as the server sees it)
pub fn decode_batch_requests(data: &[u8]) -> Result<Vec<Request>> {
    let value = decode(data)?;
    serde_json::from_value(value).map_err(|e| Error::Decoding {
        message: e.to_string(),
        raw: String::from_utf8_lossy(data).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_request() {
        let request = Request::call("sum", json!([2, 3]), 1i64).unwrap();
        let bytes = encode(&request).unwrap();
        assert_eq!(bytes, br#"{"method":"sum","params":[2,3],"id":1}"#.to_vec());
    }

    #[test]
    fn test_encode_notification_omits_id() {
        let request = Request::notification("log", json!({"msg": "hi"})).unwrap();
        let text = String::from_utf8(encode(&request).unwrap()).unwrap();
        assert!(!text.contains("\"id\""));
        assert!(text.contains("\"params\":{\"msg\":\"hi\"}"));
    }

    #[test]
    fn test_encode_batch_preserves_order() {
        let requests = vec![
            Request::call("a", json!([]), 2i64).unwrap(),
            Request::notification("b", json!([])).unwrap(),
            Request::call("c", json!([]), 1i64).unwrap(),
        ];
        let value: serde_json::Value =
            serde_json::from_slice(&encode_batch(&requests).unwrap()).unwrap();
        let methods: Vec<_> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["method"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(methods, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_round_trip_keeps_method_params_and_id() {
        let cases = vec![
            Request::call("sum", json!([2, 3]), 1i64).unwrap(),
            Request::call("lookup", json!({"key": "k"}), "req-7").unwrap(),
            Request::notification("ping", json!([])).unwrap(),
        ];

        for request in cases {
            let decoded = decode_request(&encode(&request).unwrap()).unwrap();
            assert_eq!(decoded.method(), request.method());
            assert_eq!(decoded.params(), request.params());
            assert_eq!(decoded.id(), request.id());
        }
    }

    #[test]
    fn test_decode_invalid_json_carries_raw_text() {
        match decode(b"<html>oops</html>") {
            Err(Error::Decoding { raw, .. }) => assert_eq!(raw, "<html>oops</html>"),
            other => panic!("Expected Decoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_null_is_an_error() {
        assert!(matches!(decode(b"null"), Err(Error::Decoding { .. })));
    }

    #[test]
    fn test_decode_empty_is_an_error() {
        assert!(matches!(decode(b""), Err(Error::Decoding { .. })));
    }

    #[test]
    fn test_to_response_success() {
        let decoded = to_response(json!({"result": 5, "id": 1})).unwrap();
        assert_eq!(
            decoded,
            Decoded::Single(Response::success(json!(5), Id::Number(1)))
        );
    }

    #[test]
    fn test_to_response_error() {
        let decoded = to_response(json!({
            "error": {"code": -32601, "message": "Method not found"},
            "id": 4
        }))
        .unwrap();

        match decoded {
            Decoded::Single(response) => {
                assert!(response.result().is_none());
                assert_eq!(response.error_code(), Some(-32601));
                assert_eq!(response.error_message(), Some("Method not found"));
                assert_eq!(response.id(), &Id::Number(4));
            }
            Decoded::Batch(_) => panic!("Expected single response"),
        }
    }

    #[test]
    fn test_to_response_null_error_is_success() {
        let decoded = to_response(json!({"result": "ok", "error": null, "id": "a"})).unwrap();
        match decoded {
            Decoded::Single(response) => {
                assert!(response.is_success());
                assert_eq!(response.result(), Some(&json!("ok")));
            }
            Decoded::Batch(_) => panic!("Expected single response"),
        }
    }

    #[test]
    fn test_to_response_missing_members_default_to_null() {
        match to_response(json!({})).unwrap() {
            Decoded::Single(response) => {
                assert_eq!(response.id(), &Id::Null);
                assert_eq!(response.result(), Some(&serde_json::Value::Null));
            }
            Decoded::Batch(_) => panic!("Expected single response"),
        }
    }

    #[test]
    fn test_to_response_malformed_error_object() {
        let result = to_response(json!({"error": "just a string", "id": 1}));
        assert!(matches!(result, Err(Error::Decoding { .. })));
    }

    #[test]
    fn test_to_response_float_id_is_a_decoding_error() {
        let err = to_response(json!({"result": 5, "id": 1.0})).unwrap_err();
        match err {
            Error::Decoding { message, raw } => {
                assert!(message.contains("invalid id"));
                assert_eq!(raw, "1.0");
            }
            other => panic!("Expected Decoding, got {:?}", other),
        }

        let batch = json!([{"result": 1, "id": 1}, {"result": 2, "id": 2.0}]);
        assert!(matches!(to_response(batch), Err(Error::Decoding { .. })));
    }

    #[test]
    fn test_to_response_scalar_is_an_error() {
        assert!(matches!(to_response(json!(42)), Err(Error::Decoding { .. })));
    }

    #[test]
    fn test_to_response_batch_is_keyed_by_id() {
        let decoded = to_response(json!([
            {"result": "second", "id": 2},
            {"error": {"code": 1, "message": "bad"}, "id": 1}
        ]))
        .unwrap();

        match decoded {
            Decoded::Batch(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map[&Id::Number(2)].result(), Some(&json!("second")));
                assert!(map[&Id::Number(1)].is_error());
            }
            Decoded::Single(_) => panic!("Expected batch"),
        }
    }

    #[test]
    fn test_to_response_batch_duplicate_id() {
        let result = to_response(json!([
            {"result": 1, "id": 1},
            {"result": 2, "id": 1}
        ]));
        match result {
            Err(Error::UnexpectedResponse(ids)) => assert_eq!(ids, vec![Id::Number(1)]),
            other => panic!("Expected UnexpectedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_to_response_nested_array() {
        let result = to_response(json!([[{"result": 1, "id": 1}]]));
        assert!(matches!(result, Err(Error::Decoding { .. })));
    }

    #[test]
    fn test_into_map_from_single() {
        let map = Decoded::Single(Response::success(json!(1), Id::Number(9))).into_map();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key(&Id::Number(9)));
    }

    #[test]
    fn test_decode_batch_requests() {
        let requests = vec![
            Request::call("a", json!([1]), 1i64).unwrap(),
            Request::notification("b", json!([])).unwrap(),
        ];
        let decoded = decode_batch_requests(&encode_batch(&requests).unwrap()).unwrap();
        assert_eq!(decoded, requests);
    }
}
