//! State machine implementation for the poll service
//!
//! This module implements the replicated state machine interface for the
//! poll engine.

use crate::engine::pollengine::PollEngine;
use crate::machine::StateMachine;

/// State machine that wraps the poll engine
///
/// This struct implements the replicated state machine interface and
/// delegates operations to the underlying poll engine.
#[derive(Default, Clone)]
pub struct StatePoll {
    /// The poll engine instance
    poll_engine: PollEngine,
}

impl StatePoll {
    /// Creates a new StatePoll instance
    pub fn new() -> StatePoll {
        StatePoll {
            poll_engine: PollEngine::new(),
        }
    }

    /// Read access to the underlying engine for local queries
    pub fn engine(&self) -> &PollEngine {
        &self.poll_engine
    }
}

impl StateMachine for StatePoll {
    /// Applies a log entry to the state machine
    ///
    /// # Arguments
    ///
    /// * `index` - The log index of the entry
    /// * `data` - The serialized command to apply
    fn apply(&mut self, index: u64, data: &[u8]) -> Vec<u8> {
        self.poll_engine.on_message(index, data)
    }

    /// Creates a snapshot of the current state
    ///
    /// # Returns
    ///
    /// Returns a byte vector containing the serialized state
    fn snapshot(&self) -> Vec<u8> {
        self.poll_engine.snapshot()
    }

    /// Restores state from a snapshot
    ///
    /// # Arguments
    ///
    /// * `_last_index` - The last applied log index
    /// * `data` - The snapshot data to restore from
    fn on_snapshot(&mut self, _last_index: u64, data: &[u8]) {
        if !data.is_empty() {
            self.poll_engine.on_snapshot(data);
        }
    }
}
