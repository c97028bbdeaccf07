//! Command Processing Module
//!
//! This module applies the write-side poll commands against the replicated
//! store. Every command runs all of its business-rule checks against the
//! current store contents first and stages its writes in a single batch, so
//! a rejection at any step leaves the store exactly as it was.

use crate::engine::data::store::{self, keys, KvStore, MemStore, WriteBatch};
use crate::engine::entry::{Poll, PollResults, PollSummary};
use crate::engine::error::PollError;
use crate::engine::schema::{CastVote, CreatePoll};
use crate::engine::tally::aggregator;
use crate::engine::voting::vote_index;
use serde::{Deserialize, Serialize};

/// Deterministic state machine over the four poll operations.
///
/// Owns the replica's store; never consults any input besides the command
/// payload, the caller-supplied logical time, and current store contents.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CommandProcessor {
    store: MemStore,
}

impl CommandProcessor {
    pub fn new() -> Self {
        Self {
            store: MemStore::new(),
        }
    }

    pub fn store(&self) -> &MemStore {
        &self.store
    }

    /// Creates a new poll and returns its id.
    ///
    /// Ids are derived from the poll counter, so the n-th successful
    /// creation always receives id `n` regardless of rejected commands in
    /// between.
    pub fn create_poll(
        &mut self,
        cmd: CreatePoll,
        creator: &str,
        now: u64,
    ) -> Result<String, PollError> {
        let created = store::get_counter(&self.store, keys::POLL_COUNT)?;
        let id = (created + 1).to_string();
        let expires_at = if cmd.expires > 0 {
            now.saturating_add(cmd.expires.saturating_mul(1000))
        } else {
            0
        };
        let poll = Poll {
            id: id.clone(),
            question: cmd.question,
            options: cmd.options,
            created_by: creator.to_string(),
            created_at: now,
            expires_at,
        };

        let mut batch = WriteBatch::new();
        batch.put(keys::poll(&id), store::encode(&poll)?);
        batch.put(keys::POLL_COUNT.to_string(), store::encode(&(created + 1))?);
        self.store.commit(batch);

        log::debug!("created poll {} with {} options", id, poll.options.len());
        Ok(id)
    }

    /// Records one vote and returns the ordinal it was assigned.
    pub fn cast_vote(&mut self, cmd: &CastVote, voter: &str, now: u64) -> Result<u64, PollError> {
        let poll = Poll::require(&self.store, &cmd.poll_id)?;
        if poll.is_closed(now) {
            return Err(PollError::ClosedPoll(cmd.poll_id.clone()));
        }
        if cmd.option.fract() != 0.0
            || cmd.option < 1.0
            || cmd.option > poll.options.len() as f64
        {
            return Err(PollError::InvalidOption(format!(
                "option must be an integer in 1-{}",
                poll.options.len()
            )));
        }
        let option = cmd.option as u32;
        if self.store.get(&keys::vote(&cmd.poll_id, voter)).is_some() {
            return Err(PollError::DuplicateVote(
                cmd.poll_id.clone(),
                voter.to_string(),
            ));
        }

        let mut batch = WriteBatch::new();
        let ordinal = vote_index::stage_append(&self.store, &mut batch, &cmd.poll_id, voter)?;
        batch.put(keys::vote(&cmd.poll_id, voter), store::encode(&option)?);
        self.store.commit(batch);

        log::debug!(
            "vote {} on poll {} recorded as ordinal {}",
            option,
            cmd.poll_id,
            ordinal
        );
        Ok(ordinal)
    }

    /// Read-side tally of one poll.
    pub fn poll_results(&self, poll_id: &str, now: u64) -> Result<PollResults, PollError> {
        aggregator::poll_results(&self.store, poll_id, now)
    }

    /// Read-side listing of all polls in creation order.
    pub fn list_polls(&self, now: u64) -> Result<Vec<PollSummary>, PollError> {
        aggregator::list_polls(&self.store, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::schema::CreatePoll;

    fn create(
        processor: &mut CommandProcessor,
        options: &[&str],
        expires: u64,
        now: u64,
    ) -> String {
        processor
            .create_poll(
                CreatePoll {
                    question: "Best coin?".to_string(),
                    options: options.iter().map(|s| s.to_string()).collect(),
                    expires,
                },
                "creator",
                now,
            )
            .unwrap()
    }

    fn vote(poll_id: &str, option: f64) -> CastVote {
        CastVote {
            poll_id: poll_id.to_string(),
            option,
        }
    }

    #[test]
    fn test_poll_ids_are_dense_and_ascending() {
        let mut p = CommandProcessor::new();
        assert_eq!(create(&mut p, &["a", "b"], 0, 0), "1");
        // A rejected command in between must not consume an id.
        assert!(p.cast_vote(&vote("9", 1.0), "peer-a", 0).is_err());
        assert_eq!(create(&mut p, &["a", "b"], 0, 0), "2");
        assert_eq!(create(&mut p, &["a", "b"], 0, 0), "3");
    }

    #[test]
    fn test_vote_on_unknown_poll() {
        let mut p = CommandProcessor::new();
        assert_eq!(
            p.cast_vote(&vote("1", 1.0), "peer-a", 0),
            Err(PollError::NotFound("1".to_string()))
        );
    }

    #[test]
    fn test_duplicate_vote_leaves_tallies_unchanged() {
        let mut p = CommandProcessor::new();
        let id = create(&mut p, &["a", "b"], 0, 0);
        assert_eq!(p.cast_vote(&vote(&id, 1.0), "peer-a", 0).unwrap(), 1);

        let before = p.store().clone();
        assert!(matches!(
            p.cast_vote(&vote(&id, 2.0), "peer-a", 0),
            Err(PollError::DuplicateVote(_, _))
        ));
        assert_eq!(p.store(), &before);

        let results = p.poll_results(&id, 0).unwrap();
        assert_eq!(results.total_votes, 1);
        assert_eq!(results.options[0].votes, 1);
        assert_eq!(results.options[1].votes, 0);
    }

    #[test]
    fn test_option_bounds_reject_without_mutation() {
        let mut p = CommandProcessor::new();
        let id = create(&mut p, &["a", "b", "c"], 0, 0);
        let before = p.store().clone();

        for option in [0.0, 4.0, 1.5, -1.0] {
            assert!(matches!(
                p.cast_vote(&vote(&id, option), "peer-a", 0),
                Err(PollError::InvalidOption(_))
            ));
        }
        assert_eq!(p.store(), &before);
        assert_eq!(p.cast_vote(&vote(&id, 3.0), "peer-a", 0).unwrap(), 1);
    }

    #[test]
    fn test_expiry_boundary() {
        let mut p = CommandProcessor::new();
        // Created at logical time 1000, expires after 10 seconds.
        let id = create(&mut p, &["a", "b"], 10, 1000);

        // Exactly at expiry is still open.
        assert!(p.cast_vote(&vote(&id, 1.0), "peer-a", 11000).is_ok());
        // Strictly past expiry is closed and writes nothing.
        let before = p.store().clone();
        assert_eq!(
            p.cast_vote(&vote(&id, 1.0), "peer-b", 11001),
            Err(PollError::ClosedPoll(id.clone()))
        );
        assert_eq!(p.store(), &before);
    }

    #[test]
    fn test_closed_check_precedes_option_and_duplicate_checks() {
        let mut p = CommandProcessor::new();
        let id = create(&mut p, &["a", "b"], 1, 0);
        assert!(p.cast_vote(&vote(&id, 1.0), "peer-a", 0).is_ok());
        // Out-of-range option and duplicate identity, but the poll being
        // closed is reported first.
        assert_eq!(
            p.cast_vote(&vote(&id, 9.0), "peer-a", 2000),
            Err(PollError::ClosedPoll(id))
        );
    }

    #[test]
    fn test_scenario_three_option_poll() {
        let mut p = CommandProcessor::new();
        let id = create(&mut p, &["Bitcoin", "Ethereum", "Trac"], 0, 0);
        assert_eq!(id, "1");

        assert!(p.cast_vote(&vote(&id, 3.0), "peer-a", 0).is_ok());
        assert!(p.cast_vote(&vote(&id, 1.0), "peer-b", 0).is_ok());
        assert!(matches!(
            p.cast_vote(&vote(&id, 2.0), "peer-a", 0),
            Err(PollError::DuplicateVote(_, _))
        ));

        let results = p.poll_results(&id, 0).unwrap();
        assert_eq!(results.total_votes, 2);
        assert!(!results.closed);
        let tallies: Vec<(&str, u64)> = results
            .options
            .iter()
            .map(|o| (o.label.as_str(), o.votes))
            .collect();
        assert_eq!(
            tallies,
            vec![("Bitcoin", 1), ("Ethereum", 0), ("Trac", 1)]
        );
    }
}
