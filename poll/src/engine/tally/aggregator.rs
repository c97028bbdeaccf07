//! Result Aggregation Module
//!
//! Pure read-side tallying. Everything here is a function of the current
//! store contents and the caller-supplied logical time, so any replica
//! produces the identical view; nothing in this module writes.

use crate::engine::data::store::{self, keys, KvStore};
use crate::engine::entry::{OptionTally, Poll, PollResults, PollSummary};
use crate::engine::error::PollError;
use crate::engine::voting::vote_index;

/// Tallies one poll.
///
/// An ordinal whose vote record is missing or points at an option outside
/// the poll's bounds is skipped rather than treated as an error; replicas
/// that disagree here have already diverged, and the tally should not also
/// become unreadable.
pub fn poll_results(
    store: &dyn KvStore,
    poll_id: &str,
    now: u64,
) -> Result<PollResults, PollError> {
    let poll = Poll::require(store, poll_id)?;
    let mut tallies = vec![0u64; poll.options.len()];
    let mut total_votes = 0u64;

    for voter in vote_index::enumerate(store, poll_id)? {
        let option = match store.get(&keys::vote(poll_id, &voter)) {
            Some(bytes) => store::decode::<u32>(&bytes)?,
            None => {
                log::warn!("skipping indexed voter {} without vote record", voter);
                continue;
            }
        };
        if option < 1 || option as usize > poll.options.len() {
            log::warn!(
                "skipping out-of-range vote {} by {} on poll {}",
                option,
                voter,
                poll_id
            );
            continue;
        }
        tallies[(option - 1) as usize] += 1;
        total_votes += 1;
    }

    let options = poll
        .options
        .iter()
        .zip(tallies)
        .map(|(label, votes)| OptionTally {
            label: label.clone(),
            votes,
        })
        .collect();

    let closed = poll.is_closed(now);
    Ok(PollResults {
        poll_id: poll.id,
        question: poll.question,
        options,
        total_votes,
        closed,
    })
}

/// Lists every existing poll in ascending id order with its vote count.
pub fn list_polls(store: &dyn KvStore, now: u64) -> Result<Vec<PollSummary>, PollError> {
    let created = store::get_counter(store, keys::POLL_COUNT)?;
    let mut summaries = Vec::with_capacity(created as usize);
    for id in 1..=created {
        let id = id.to_string();
        let poll = match Poll::load(store, &id)? {
            Some(poll) => poll,
            None => continue,
        };
        let closed = poll.is_closed(now);
        summaries.push(PollSummary {
            poll_id: poll.id,
            question: poll.question,
            total_votes: vote_index::count(store, &id)?,
            closed,
        });
    }
    Ok(summaries)
}
