//! JSON-RPC client over HTTP
//!
//! This module provides the main `HttpClient` type. Every operation is one
//! HTTP exchange on a connection of its own: encode, send, read until the
//! server closes, strip the envelope, decode, check ids.
//!
//! # Operations
//!
//! - `call`: build a request with a fresh id, send it, return the response
//! - `send_request`: same, for a request the caller built
//! - `notify`: send a request without an id and read nothing back
//! - `send_batch` / `batch`: send many requests at once and get the responses
//!   back in request order
//!
//! A server-side failure (`{"error": {...}}`) is a normal [`Response`], not an
//! `Err`. `Err` means the exchange itself went wrong.
//!
//! # Configuration
//!
//! Target, credentials and timeout are plain fields read at call time. The
//! setters take `&mut self`, so they cannot race with calls in flight.
//!
//! # Cloning
//!
//! Clones share the transport, the metrics and the id counter, so ids stay
//! unique across clones.

use crate::auth::basic_auth_header;
use crate::batch::{BatchReply, BatchRequest};
use crate::correlation::BatchCorrelator;
use crate::request::IdGenerator;
use crate::target::Target;
use crate::transport::{Exchange, Transport};
use crate::{ClientBuilder, ClientMetrics};
use jrhttp_core::{codec, Decoded, Error, Id, Request, Response, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Timeout applied to each exchange unless configured otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// JSON-RPC client over HTTP/1.0
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) target: Target,
    /// Header configured explicitly; wins over URL credentials
    pub(crate) auth_header: Option<String>,
    /// Header derived from credentials in the target URL
    pub(crate) url_auth: Option<String>,
    pub(crate) timeout: Duration,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) ids: IdGenerator,
    pub(crate) metrics: Option<Arc<ClientMetrics>>,
}

impl HttpClient {
    /// Create a client for `url` with default settings
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTarget` if the URL cannot be used.
    pub fn new(url: &str) -> Result<Self> {
        ClientBuilder::new(url).build()
    }

    /// Start configuring a client for `url`
    pub fn builder(url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(url)
    }

    /// Call `method` and wait for its response
    ///
    /// The request gets the next id from the client's counter.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use jrhttp_client::HttpClient;
    ///
    /// # async fn example() -> jrhttp_core::Result<()> {
    /// let client = HttpClient::new("http://localhost:8080/")?;
    /// let response = client.call("sum", [2, 3]).await?;
    /// assert_eq!(response.result(), Some(&serde_json::json!(5)));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<P>(&self, method: impl Into<String>, params: P) -> Result<Response>
    where
        P: Serialize,
    {
        let request = Request::from_serialize(method, &params, Some(self.ids.next_id()?))?;
        self.send_request(request).await
    }

    /// Send a prebuilt request and wait for its response
    ///
    /// # Errors
    ///
    /// - `Error::InvalidRequest` if `request` is a notification
    /// - `Error::MismatchedId` if the reply answers a different id
    /// - transport and decoding errors as they occur
    #[tracing::instrument(skip(self, request), fields(method = %request.method(), url = %self.target))]
    pub async fn send_request(&self, request: Request) -> Result<Response> {
        let Some(expected) = request.id().cloned() else {
            return Err(Error::InvalidRequest(format!(
                "'{}' has no id and gets no response; use notify",
                request.method()
            )));
        };

        let start = Instant::now();
        let result = self.round_trip(&request, expected).await;
        self.record_call(request.method(), start, &result);
        result
    }

    async fn round_trip(&self, request: &Request, expected: Id) -> Result<Response> {
        let body = codec::encode(request)?;
        let reply = self.transport.send(&self.exchange(&body)).await?;

        match codec::decode_response(&reply)? {
            Decoded::Single(response) if response.id() == &expected => Ok(response),
            Decoded::Single(response) => Err(Error::MismatchedId {
                expected,
                actual: response.id().clone(),
            }),
            Decoded::Batch(_) => Err(Error::Decoding {
                message: "batch reply to a single call".to_string(),
                raw: String::from_utf8_lossy(&reply).into_owned(),
            }),
        }
    }

    /// Send a notification; nothing is read back
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidNotify` without touching the network if
    /// `request` carries an id.
    #[tracing::instrument(skip(self, request), fields(method = %request.method(), url = %self.target))]
    pub async fn notify(&self, request: Request) -> Result<()> {
        if let Some(id) = request.id() {
            return Err(Error::InvalidNotify(id.clone()));
        }

        let result = self.deliver(&request).await;
        match (&result, &self.metrics) {
            (Ok(()), Some(m)) => m.record_notification(request.method()),
            (Err(e), Some(m)) => m.record_error(e.kind()),
            _ => {}
        }
        result
    }

    async fn deliver(&self, request: &Request) -> Result<()> {
        let body = codec::encode(request)?;
        self.transport.deliver(&self.exchange(&body)).await
    }

    /// Send requests as one batch
    ///
    /// Responses come back in the order of the id-bearing requests, whatever
    /// order the server used. A batch of only notifications is still sent and
    /// yields `BatchReply::NotificationsOnly`.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidRequest` for an empty batch or repeated ids, before any I/O
    /// - `Error::MissingResponse` / `Error::UnexpectedResponse` when the reply
    ///   does not match the batch one-to-one
    #[tracing::instrument(skip(self, requests), fields(batch_size = requests.len(), url = %self.target))]
    pub async fn send_batch(&self, requests: Vec<Request>) -> Result<BatchReply> {
        if requests.is_empty() {
            return Err(Error::InvalidRequest("batch cannot be empty".to_string()));
        }
        let correlator = BatchCorrelator::from_requests(&requests)?;

        let result = self.batch_round_trip(&requests, correlator).await;

        if let Some(ref m) = self.metrics {
            m.record_batch(requests.len() as u64);
            if let Err(e) = &result {
                m.record_error(e.kind());
            }
        }
        if let Ok(reply) = &result {
            tracing::debug!(responses = reply.len(), "Batch completed");
        }
        result
    }

    async fn batch_round_trip(
        &self,
        requests: &[Request],
        correlator: BatchCorrelator,
    ) -> Result<BatchReply> {
        let body = codec::encode_batch(requests)?;
        let exchange = self.exchange(&body);

        if correlator.is_notification_only() {
            self.transport.deliver(&exchange).await?;
            return Ok(BatchReply::NotificationsOnly);
        }

        let reply = self.transport.send(&exchange).await?;
        let responses = codec::decode_response(&reply)?.into_map();
        correlator.correlate(responses).map(BatchReply::Responses)
    }

    /// Send a batch built with [`BatchRequest`]
    pub async fn batch(&self, batch: BatchRequest) -> Result<BatchReply> {
        self.send_batch(batch.into_requests()).await
    }

    /// Point the client at a different server
    ///
    /// Credentials in the URL replace those of the previous target. They are
    /// used only while no explicit header is set.
    pub fn set_target(&mut self, url: &str) -> Result<()> {
        let target = Target::parse(url)?;
        self.url_auth = url_auth(&target);
        self.target = target;
        Ok(())
    }

    /// Use HTTP Basic credentials
    pub fn set_basic_auth(&mut self, username: &str, password: &str) {
        self.auth_header = Some(basic_auth_header(username, password));
    }

    /// Set the `Authorization` header value, or clear it with `None`
    ///
    /// Clearing falls back to credentials in the target URL, if any.
    pub fn set_auth_header(&mut self, header: Option<String>) {
        self.auth_header = header;
    }

    /// Set the timeout for each exchange
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// The `Authorization` value that will be sent, if any
    pub fn auth_header(&self) -> Option<&str> {
        self.auth_header.as_deref().or(self.url_auth.as_deref())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn exchange<'a>(&'a self, body: &'a [u8]) -> Exchange<'a> {
        Exchange {
            target: &self.target,
            auth_header: self.auth_header(),
            body,
            timeout: self.timeout,
        }
    }

    fn record_call(&self, method: &str, start: Instant, result: &Result<Response>) {
        let duration = start.elapsed().as_secs_f64();

        let status = match result {
            Ok(response) if response.is_success() => "success",
            Ok(response) => {
                tracing::debug!(code = response.error_code(), "Server returned an error response");
                "rpc_error"
            }
            Err(e) => {
                tracing::warn!(method = %method, error = %e, "Call failed");
                e.kind()
            }
        };

        if let Some(ref m) = self.metrics {
            m.record_call(method, status, duration);
            if let Err(e) = result {
                m.record_error(e.kind());
            }
        }

        tracing::debug!(method = %method, status, duration_secs = duration, "Call completed");
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Authorization values are secrets; only report whether one is set.
        f.debug_struct("HttpClient")
            .field("target", &self.target.to_string())
            .field("authenticated", &self.auth_header().is_some())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Basic header for credentials embedded in the target URL
pub(crate) fn url_auth(target: &Target) -> Option<String> {
    target
        .credentials()
        .map(|c| basic_auth_header(&c.username, &c.password))
}
