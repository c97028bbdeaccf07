//! Key/Value Store Module
//!
//! This module defines the contract the poll engine requires from the
//! replicated store: point lookups, point writes, last-write-wins per key,
//! read-your-writes within a single command application. The store has no
//! iteration primitive; anything that must be enumerated keeps an explicit
//! counter plus ordinal-keyed index (see the vote index).

use crate::engine::error::PollError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key layout of the poll state machine.
///
/// All keys are flat strings; the store never interprets them.
pub mod keys {
    /// Number of polls created so far, also the source of the next poll id.
    pub const POLL_COUNT: &str = "polls/count";

    /// Poll record for `id`.
    pub fn poll(id: &str) -> String {
        format!("poll/{}", id)
    }

    /// Chosen option index of `voter` on poll `id`.
    pub fn vote(poll_id: &str, voter: &str) -> String {
        format!("vote/{}/{}", poll_id, voter)
    }

    /// Number of accepted votes on poll `id`.
    pub fn vote_count(poll_id: &str) -> String {
        format!("votes/count/{}", poll_id)
    }

    /// Voter identity behind ordinal `n` on poll `id`.
    pub fn vote_addr(poll_id: &str, ordinal: u64) -> String {
        format!("votes/addr/{}/{}", poll_id, ordinal)
    }
}

/// Point-addressable store shared by all commands.
///
/// A command stages every write it intends to make into a [`WriteBatch`]
/// and commits the batch only once all business rules have passed, so a
/// rejected command leaves the store untouched.
pub trait KvStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Applies every write in `batch` as a single unit.
    fn commit(&mut self, batch: WriteBatch);
}

/// Ordered set of pending writes for one command.
#[derive(Debug, Default, Clone)]
pub struct WriteBatch {
    writes: Vec<(String, Vec<u8>)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: String, value: Vec<u8>) {
        self.writes.push((key, value));
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    fn into_writes(self) -> Vec<(String, Vec<u8>)> {
        self.writes
    }
}

/// In-memory store replica.
///
/// Entries are kept in a `BTreeMap` so that serializing two stores holding
/// the same entries yields identical bytes.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MemStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn commit(&mut self, batch: WriteBatch) {
        for (key, value) in batch.into_writes() {
            self.entries.insert(key, value);
        }
    }
}

/// Encodes a value for storage.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, PollError> {
    bincode::serialize(value).map_err(|e| PollError::Store(e.to_string()))
}

/// Decodes a stored value.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, PollError> {
    bincode::deserialize(bytes).map_err(|e| PollError::Store(e.to_string()))
}

/// Reads a counter, defaulting to 0 when the key was never written.
pub fn get_counter(store: &dyn KvStore, key: &str) -> Result<u64, PollError> {
    match store.get(key) {
        Some(bytes) => decode(&bytes),
        None => Ok(0),
    }
}
