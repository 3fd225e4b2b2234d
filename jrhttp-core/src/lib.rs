//! Core JSON-RPC types and codec for jrhttp
//!
//! This crate provides the transport-independent half of the jrhttp client:
//!
//! - **Types**: `Request`, `Response` and `Id` value objects
//! - **Codec**: encoding requests to JSON and shaping replies into responses
//! - **Error handling**: the error taxonomy every call reports through
//! - **Observability**: OpenTelemetry and `tracing` bootstrap
//!
//! # Architecture
//!
//! Nothing in here opens a socket. The `jrhttp-client` crate adds the HTTP
//! framing, the TCP transport and the batch correlation engine on top.
//!
//! # Example
//!
//! ```rust
//! use jrhttp_core::{codec, Request};
//! use serde_json::json;
//!
//! let request = Request::call("add", json!({"a": 5, "b": 3}), 1i64).unwrap();
//! let bytes = codec::encode(&request).unwrap();
//!
//! let decoded = codec::decode_request(&bytes).unwrap();
//! assert_eq!(decoded.method(), "add");
//! ```

pub mod codec;
pub mod error;
pub mod observability;
pub mod types;

pub use codec::Decoded;
pub use error::{Error, Result, RpcErrorData};
pub use observability::{init_observability, shutdown_observability, ObservabilityConfig};
pub use types::{Id, Request, Response};
