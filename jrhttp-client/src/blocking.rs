//! Blocking client
//!
//! Wraps [`crate::HttpClient`] with a current-thread tokio runtime and drives
//! each operation to completion on the calling thread. Use it from plain
//! synchronous code. Calling it from inside an async runtime panics, as
//! blocking on a runtime from within another one always does.
//!
//! # Examples
//!
//! ```rust,no_run
//! use jrhttp_client::blocking::HttpClient;
//!
//! # fn example() -> jrhttp_core::Result<()> {
//! let client = HttpClient::new("http://localhost:8080/")?;
//! let response = client.call("sum", [2, 3])?;
//! println!("{:?}", response.result());
//! # Ok(())
//! # }
//! ```

use crate::batch::{BatchReply, BatchRequest};
use crate::target::Target;
use crate::ClientBuilder;
use jrhttp_core::{Error, Request, Response, Result};
use serde::Serialize;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

/// Synchronous JSON-RPC client over HTTP/1.0
pub struct HttpClient {
    inner: crate::HttpClient,
    runtime: Runtime,
}

impl HttpClient {
    /// Create a client for `url` with default settings
    pub fn new(url: &str) -> Result<Self> {
        Self::from_async(crate::HttpClient::new(url)?)
    }

    /// Build the async client with `builder`, then wrap it
    pub fn from_builder(builder: ClientBuilder) -> Result<Self> {
        Self::from_async(builder.build()?)
    }

    /// Wrap a configured async client
    ///
    /// # Errors
    ///
    /// Returns `Error::Internal` if the runtime cannot be started.
    pub fn from_async(inner: crate::HttpClient) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Internal(format!("Failed to start runtime: {}", e)))?;
        Ok(Self { inner, runtime })
    }

    /// See [`crate::HttpClient::call`]
    pub fn call<P>(&self, method: impl Into<String>, params: P) -> Result<Response>
    where
        P: Serialize,
    {
        self.runtime.block_on(self.inner.call(method, params))
    }

    /// See [`crate::HttpClient::send_request`]
    pub fn send_request(&self, request: Request) -> Result<Response> {
        self.runtime.block_on(self.inner.send_request(request))
    }

    /// See [`crate::HttpClient::notify`]
    pub fn notify(&self, request: Request) -> Result<()> {
        self.runtime.block_on(self.inner.notify(request))
    }

    /// See [`crate::HttpClient::send_batch`]
    pub fn send_batch(&self, requests: Vec<Request>) -> Result<BatchReply> {
        self.runtime.block_on(self.inner.send_batch(requests))
    }

    /// See [`crate::HttpClient::batch`]
    pub fn batch(&self, batch: BatchRequest) -> Result<BatchReply> {
        self.runtime.block_on(self.inner.batch(batch))
    }

    pub fn set_target(&mut self, url: &str) -> Result<()> {
        self.inner.set_target(url)
    }

    pub fn set_basic_auth(&mut self, username: &str, password: &str) {
        self.inner.set_basic_auth(username, password);
    }

    pub fn set_auth_header(&mut self, header: Option<String>) {
        self.inner.set_auth_header(header);
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.inner.set_timeout(timeout);
    }

    pub fn target(&self) -> &Target {
        self.inner.target()
    }

    pub fn auth_header(&self) -> Option<&str> {
        self.inner.auth_header()
    }

    pub fn timeout(&self) -> Duration {
        self.inner.timeout()
    }

    /// Unwrap the async client
    pub fn into_async(self) -> crate::HttpClient {
        self.inner
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("blocking::HttpClient").field(&self.inner).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jrhttp_core::Id;
    use serde_json::json;

    #[test]
    fn test_notify_with_id_fails_without_runtime_io() {
        let client = HttpClient::new("http://127.0.0.1:9/").unwrap();
        let err = client
            .notify(Request::call("log", json!([]), 3i64).unwrap())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidNotify(Id::Number(3))));
    }

    #[test]
    fn test_setters_delegate() {
        let mut client = HttpClient::from_builder(
            ClientBuilder::new("http://localhost:8080/").timeout(Duration::from_secs(3)),
        )
        .unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(3));

        client.set_timeout(Duration::from_secs(1));
        client.set_basic_auth("user", "pass");
        client.set_target("http://example.com/rpc").unwrap();

        let inner = client.into_async();
        assert_eq!(inner.timeout(), Duration::from_secs(1));
        assert_eq!(inner.auth_header(), Some("Basic dXNlcjpwYXNz"));
        assert_eq!(inner.target().path(), "/rpc");
    }
}
