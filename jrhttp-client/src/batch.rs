//! Batch building and batch results
//!
//! A batch is an ordered list of requests sent as one JSON array in one HTTP
//! exchange. Calls and notifications can be mixed freely; only calls get an
//! entry in the result.
//!
//! # Usage Pattern
//!
//! 1. Create a `BatchRequest`
//! 2. Add calls and/or notifications (order is kept)
//! 3. Send it with `HttpClient::batch`
//! 4. Read the `BatchReply`, whose responses follow the order of the calls
//!
//! # Examples
//!
//! ```rust,no_run
//! use jrhttp_client::{BatchRequest, HttpClient};
//! use serde_json::json;
//!
//! # async fn example(client: &HttpClient) -> jrhttp_core::Result<()> {
//! let mut batch = BatchRequest::new();
//! let first = batch.add_call("get_balance", json!(["alice"]))?;
//! batch.add_notification("audit", json!({"who": "alice"}))?;
//! let second = batch.add_call("get_balance", json!(["bob"]))?;
//!
//! let reply = client.batch(batch).await?;
//! assert_eq!(reply.responses()[0].id(), &first);
//! assert_eq!(reply.responses()[1].id(), &second);
//! # Ok(())
//! # }
//! ```

use jrhttp_core::{Id, Request, Response, Result, RpcErrorData};
use serde::Serialize;

/// Builder for an ordered batch
///
/// Ids assigned by `add_call` count up from 1 and are unique within the batch.
/// Requests added with `push` keep their own ids.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    requests: Vec<Request>,
    next_id: i64,
}

impl BatchRequest {
    /// Create an empty batch
    pub fn new() -> Self {
        Self {
            requests: Vec::new(),
            next_id: 1,
        }
    }

    /// Add a call and return the id it was given
    ///
    /// # Errors
    ///
    /// `Error::Encoding` if `params` cannot be serialized, `Error::InvalidRequest`
    /// if the method is empty or the params are a scalar.
    pub fn add_call<P>(&mut self, method: impl Into<String>, params: P) -> Result<Id>
    where
        P: Serialize,
    {
        let id = Id::Number(self.next_id);
        let request = Request::from_serialize(method, &params, Some(id.clone()))?;
        self.next_id += 1;
        self.requests.push(request);
        Ok(id)
    }

    /// Add a notification (no id, no reply entry)
    pub fn add_notification<P>(&mut self, method: impl Into<String>, params: P) -> Result<()>
    where
        P: Serialize,
    {
        self.requests
            .push(Request::from_serialize(method, &params, None)?);
        Ok(())
    }

    /// Append a prebuilt request
    pub fn push(&mut self, request: Request) {
        self.requests.push(request);
    }

    /// Total number of requests, calls and notifications
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Check if the batch is empty
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Ids of the calls, in batch order
    pub fn request_ids(&self) -> Vec<Id> {
        self.requests
            .iter()
            .filter_map(|r| r.id().cloned())
            .collect()
    }

    /// The requests, in batch order
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Consume the builder
    pub fn into_requests(self) -> Vec<Request> {
        self.requests
    }
}

impl Default for BatchRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Request>> for BatchRequest {
    fn from(requests: Vec<Request>) -> Self {
        Self {
            requests,
            next_id: 1,
        }
    }
}

/// Result of a batch call
#[derive(Debug, Clone, PartialEq)]
pub enum BatchReply {
    /// One response per call, in the order the calls appeared in the batch
    Responses(Vec<Response>),
    /// The batch held only notifications; nothing was read back
    NotificationsOnly,
}

impl BatchReply {
    /// The correlated responses; empty for a notification-only batch
    pub fn responses(&self) -> &[Response] {
        match self {
            BatchReply::Responses(responses) => responses,
            BatchReply::NotificationsOnly => &[],
        }
    }

    /// Consume the reply, returning the correlated responses
    pub fn into_responses(self) -> Vec<Response> {
        match self {
            BatchReply::Responses(responses) => responses,
            BatchReply::NotificationsOnly => Vec::new(),
        }
    }

    /// Look up the response for one call
    pub fn get(&self, id: &Id) -> Option<&Response> {
        self.responses().iter().find(|r| r.id() == id)
    }

    /// True when the batch held only notifications
    pub fn is_notifications_only(&self) -> bool {
        matches!(self, BatchReply::NotificationsOnly)
    }

    /// Number of responses
    pub fn len(&self) -> usize {
        self.responses().len()
    }

    /// Check if there are no responses
    pub fn is_empty(&self) -> bool {
        self.responses().is_empty()
    }

    /// Check if every call succeeded
    pub fn all_success(&self) -> bool {
        self.responses().iter().all(Response::is_success)
    }

    /// Error responses with the id of the call they answer
    pub fn errors(&self) -> Vec<(&Id, &RpcErrorData)> {
        self.responses()
            .iter()
            .filter_map(|r| r.error_data().map(|e| (r.id(), e)))
            .collect()
    }
}
