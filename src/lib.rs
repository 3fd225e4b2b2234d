//! jrhttp - JSON-RPC over HTTP
//!
//! This is the main convenience crate that re-exports the jrhttp sub-crates.
//! Use it if you want a single dependency for the whole client.
//!
//! # Architecture
//!
//! jrhttp is organized into modular crates:
//!
//! - **jrhttp-core**: request/response types, codec, error handling, observability
//! - **jrhttp-client**: HTTP framing, TCP transport, batch correlation, client facades
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use jrhttp::HttpClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new("http://localhost:8080/")?;
//!
//!     let response = client.call("add", serde_json::json!({"a": 5, "b": 3})).await?;
//!     println!("Result: {:?}", response.result());
//!
//!     Ok(())
//! }
//! ```

pub use jrhttp_client as client;
pub use jrhttp_core as core;

// Convenience re-exports of the most commonly used types
pub use jrhttp_client::{BatchReply, BatchRequest, ClientBuilder, HttpClient};
pub use jrhttp_core::{Error, Id, Request, Response, Result};
