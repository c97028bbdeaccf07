use crate::engine::data::store::{self, keys, KvStore};
use crate::engine::error::PollError;
use serde::{Deserialize, Serialize};

/// Persisted poll record. Written once by `createPoll`, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Poll {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub created_by: String,
    pub created_at: u64,
    /// Logical expiry in milliseconds, 0 = never expires.
    pub expires_at: u64,
}

impl Poll {
    /// A poll is closed strictly after its expiry; a vote at exactly
    /// `expires_at` is still accepted.
    pub fn is_closed(&self, now: u64) -> bool {
        self.expires_at > 0 && now > self.expires_at
    }

    /// Loads the poll record for `id`, if one exists.
    pub fn load(store: &dyn KvStore, id: &str) -> Result<Option<Poll>, PollError> {
        match store.get(&keys::poll(id)) {
            Some(bytes) => Ok(Some(store::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Loads the poll record for `id` or fails with `NotFound`.
    pub fn require(store: &dyn KvStore, id: &str) -> Result<Poll, PollError> {
        Poll::load(store, id)?.ok_or_else(|| PollError::NotFound(id.to_string()))
    }
}
