//! Matching batch replies back to the requests that caused them
//!
//! A server may answer a batch in any order. It may also, through bugs, leave
//! entries out or add ones nobody asked for. The correlator turns the server's
//! id-keyed reply set into a list ordered exactly like the id-bearing requests
//! of the original batch, and refuses anything that is not a one-to-one match.
//!
//! # Algorithm
//!
//! 1. Record the ids of the id-bearing requests, in batch order
//!    (notifications have no reply slot and are skipped)
//! 2. For each recorded id, in order, take its response out of the reply set;
//!    a missing id stops correlation at once with `Error::MissingResponse`
//! 3. Anything left in the reply set afterwards is reported with
//!    `Error::UnexpectedResponse`
//!
//! No partial result is ever returned.

use jrhttp_core::{Error, Id, Request, Response, Result};
use std::collections::{HashMap, HashSet};

/// Correlation state for one batch call
#[derive(Debug, Clone)]
pub struct BatchCorrelator {
    expected: Vec<Id>,
}

impl BatchCorrelator {
    /// Record the ids of a batch in order
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRequest` if two requests share an id, since their
    /// replies could not be told apart.
    pub fn from_requests(requests: &[Request]) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut expected = Vec::new();

        for id in requests.iter().filter_map(Request::id) {
            if !seen.insert(id) {
                return Err(Error::InvalidRequest(format!(
                    "duplicate id {} in batch",
                    id
                )));
            }
            expected.push(id.clone());
        }

        Ok(Self { expected })
    }

    /// Ids awaiting a response, in batch order
    pub fn expected_ids(&self) -> &[Id] {
        &self.expected
    }

    /// True if no request in the batch expects a response
    pub fn is_notification_only(&self) -> bool {
        self.expected.is_empty()
    }

    /// Order the replies like the original requests
    ///
    /// # Errors
    ///
    /// - `Error::MissingResponse` naming the first expected id with no reply
    /// - `Error::UnexpectedResponse` listing reply ids nobody asked for,
    ///   sorted by their display form
    pub fn correlate(self, mut replies: HashMap<Id, Response>) -> Result<Vec<Response>> {
        let mut ordered = Vec::with_capacity(self.expected.len());

        for id in self.expected {
            match replies.remove(&id) {
                Some(response) => ordered.push(response),
                None => return Err(Error::MissingResponse(id)),
            }
        }

        if !replies.is_empty() {
            let mut extra: Vec<Id> = replies.into_keys().collect();
            extra.sort_by_cached_key(|id| id.to_string());
            return Err(Error::UnexpectedResponse(extra));
        }

        Ok(ordered)
    }
}
