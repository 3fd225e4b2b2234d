//! Request id allocation
//!
//! Each client hands out numeric ids from its own counter, starting at 1.
//! Ids are never reused for the life of the client, so a reply can always be
//! matched to the call that caused it. Callers building requests by hand can
//! pick their own ids instead; the client does not check those against the
//! counter.

use jrhttp_core::{Error, Id, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generator of unique numeric request ids
///
/// Clones share the counter.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    counter: Arc<AtomicU64>,
}

impl IdGenerator {
    /// Create a generator whose first id is 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a generator whose first id is `first`
    pub fn starting_at(first: u64) -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(first)),
        }
    }

    /// Allocate the next id
    ///
    /// # Errors
    ///
    /// Returns `Error::Internal` once the counter has passed `i64::MAX`.
    pub fn next_id(&self) -> Result<Id> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        Id::try_from(n).map_err(|_| Error::Internal(format!("request id {} out of range", n)))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
