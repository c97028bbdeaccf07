//! Poll Engine Core
//!
//! This module implements the deterministic core applied by every replica.
//! It decodes command envelopes, validates payloads, dispatches to the
//! command processor, and encodes replies for the transport to deliver.
//! All state lives in the embedded store so a snapshot captures everything.

use crate::engine::entry::{PollResults, PollSummary};
use crate::engine::error::PollError;
use crate::engine::schema::SchemaValidator;
use crate::engine::voting::CommandProcessor;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Represents the different operations the poll engine can process
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PollCmdType {
    /// Create a new poll with a question and option list
    CreatePoll,
    /// Record one identity's vote on a poll
    CastVote,
    /// Tally a single poll
    ReadPollResults,
    /// List every poll with its vote count
    #[default]
    ListPolls,
}

/// Command envelope delivered by the ordering layer
///
/// `identity` has been verified upstream and `time` is the logical
/// timestamp the ordering layer attached; the engine never reads a local
/// clock.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PollCmd {
    /// The operation to execute
    pub cmd: PollCmdType,
    /// Verified identity of the sender
    #[serde(default)]
    pub identity: String,
    /// Logical time in milliseconds, agreed by the ordering layer
    #[serde(default)]
    pub time: u64,
    /// Operation-specific payload
    #[serde(default)]
    pub payload: Value,
}

/// Successful outcome of one command.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CmdOutput {
    PollCreated { poll_id: String },
    VoteAccepted { poll_id: String, ordinal: u64 },
    Results(PollResults),
    Polls(Vec<PollSummary>),
}

/// The replicated poll state machine
///
/// Maintains the store, the logical clock, and the last applied log index.
/// Applying the same command sequence to two engines yields byte-identical
/// snapshots.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PollEngine {
    /// Last applied log index
    index: u64,
    /// Highest logical time seen so far; never moves backwards
    clock: u64,
    /// Validation bounds come from local config, not replicated state
    #[serde(skip, default)]
    validator: SchemaValidator,
    /// Processor owning the replica's store
    processor: CommandProcessor,
}

impl PollEngine {
    /// Creates a new engine over an empty store
    pub fn new() -> PollEngine {
        PollEngine::default()
    }

    /// Last applied log index
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Current logical time
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Processes one committed log entry and returns the serialized reply
    ///
    /// # Arguments
    /// * `index` - The log index of this entry
    /// * `data` - JSON command envelope to process
    pub fn on_message(&mut self, index: u64, data: &[u8]) -> Vec<u8> {
        log::debug!("on_message: index {} len {}", index, data.len());
        self.index = index;
        let cmd: PollCmd = match serde_json::from_slice(data) {
            Ok(cmd) => cmd,
            Err(e) => {
                log::error!("failed to deserialize poll cmd: {}", e);
                return encode_reply(Err(PollError::Validation(format!(
                    "malformed command envelope: {}",
                    e
                ))));
            }
        };
        encode_reply(self.apply_cmd(&cmd))
    }

    /// Applies one decoded command
    pub fn apply_cmd(&mut self, cmd: &PollCmd) -> Result<CmdOutput, PollError> {
        if cmd.time > self.clock {
            self.clock = cmd.time;
        }
        let now = self.clock;
        match cmd.cmd {
            PollCmdType::CreatePoll => {
                self.validator.identity(&cmd.identity)?;
                let create = self.validator.create_poll(&cmd.payload)?;
                let poll_id = self.processor.create_poll(create, &cmd.identity, now)?;
                Ok(CmdOutput::PollCreated { poll_id })
            }
            PollCmdType::CastVote => {
                self.validator.identity(&cmd.identity)?;
                let vote = self.validator.cast_vote(&cmd.payload)?;
                let ordinal = self.processor.cast_vote(&vote, &cmd.identity, now)?;
                Ok(CmdOutput::VoteAccepted {
                    poll_id: vote.poll_id,
                    ordinal,
                })
            }
            PollCmdType::ReadPollResults => {
                let read = self.validator.read_results(&cmd.payload)?;
                let results = self.processor.poll_results(&read.poll_id, now)?;
                Ok(CmdOutput::Results(results))
            }
            PollCmdType::ListPolls => Ok(CmdOutput::Polls(self.processor.list_polls(now)?)),
        }
    }

    /// Pure read for replicas serving local queries without a log round-trip
    pub fn query_results(&self, poll_id: &str, now: u64) -> Result<PollResults, PollError> {
        self.processor.poll_results(poll_id, now)
    }

    /// Pure read listing of all polls
    pub fn list_polls(&self, now: u64) -> Result<Vec<PollSummary>, PollError> {
        self.processor.list_polls(now)
    }

    /// Restores engine state from a snapshot
    ///
    /// # Arguments
    /// * `data` - Serialized engine state data
    pub fn on_snapshot(&mut self, data: &[u8]) {
        match bincode::deserialize(data) {
            Ok(poll_engine) => *self = poll_engine,
            Err(e) => {
                log::error!("failed to deserialize poll engine: {}", e);
            }
        }
    }

    /// Creates a snapshot of the current engine state
    ///
    /// # Returns
    /// Serialized engine state as a byte vector; empty only if
    /// serialization failed, which is logged and ignored on restore
    pub fn snapshot(&self) -> Vec<u8> {
        match bincode::serialize(&self) {
            Ok(data) => data,
            Err(e) => {
                log::error!("failed to serialize poll engine: {}", e);
                Vec::new()
            }
        }
    }
}

fn encode_reply(result: Result<CmdOutput, PollError>) -> Vec<u8> {
    let reply = match result {
        Ok(output) => json!({"ok": true, "result": output}),
        Err(e) => json!({"ok": false, "error": e.kind(), "message": e.to_string()}),
    };
    serde_json::to_vec(&reply).unwrap_or_default()
}
