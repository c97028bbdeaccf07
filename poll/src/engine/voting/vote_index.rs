//! Vote Index Module
//!
//! The store only supports point lookups, so votes cannot be discovered by
//! prefix scan. Each poll therefore keeps a dense ordinal index: a per-poll
//! counter plus one `votes/addr/<pollId>/<ordinal>` entry per accepted vote,
//! mapping ordinals 1..count to voter identities. The same counter + index
//! pattern applies to any entity that needs enumeration on this store.

use crate::engine::data::store::{self, keys, KvStore, WriteBatch};
use crate::engine::error::PollError;

/// Number of accepted votes on `poll_id`.
pub fn count(store: &dyn KvStore, poll_id: &str) -> Result<u64, PollError> {
    store::get_counter(store, &keys::vote_count(poll_id))
}

/// Stages the index writes for one new vote into `batch` and returns the
/// ordinal assigned to it.
///
/// The counter is only advanced when the caller commits the batch, so a
/// rejected command never burns an ordinal and the sequence stays dense.
pub fn stage_append(
    store: &dyn KvStore,
    batch: &mut WriteBatch,
    poll_id: &str,
    voter: &str,
) -> Result<u64, PollError> {
    let ordinal = count(store, poll_id)? + 1;
    batch.put(
        keys::vote_addr(poll_id, ordinal),
        store::encode(&voter.to_string())?,
    );
    batch.put(keys::vote_count(poll_id), store::encode(&ordinal)?);
    Ok(ordinal)
}

/// Enumerates the voter identities of `poll_id` in ordinal order.
///
/// An ordinal whose index entry is missing or unreadable is skipped with a
/// warning instead of failing the whole read; see the aggregator for the
/// matching treatment of vote records.
pub fn enumerate(store: &dyn KvStore, poll_id: &str) -> Result<Vec<String>, PollError> {
    let count = count(store, poll_id)?;
    let mut voters = Vec::with_capacity(count as usize);
    for ordinal in 1..=count {
        match store.get(&keys::vote_addr(poll_id, ordinal)) {
            Some(bytes) => match store::decode::<String>(&bytes) {
                Ok(voter) => voters.push(voter),
                Err(e) => {
                    log::warn!(
                        "skipping unreadable vote index entry {}/{}: {}",
                        poll_id,
                        ordinal,
                        e
                    );
                }
            },
            None => {
                log::warn!("skipping missing vote index entry {}/{}", poll_id, ordinal);
            }
        }
    }
    Ok(voters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::data::store::MemStore;

    fn append(store: &mut MemStore, poll_id: &str, voter: &str) -> u64 {
        let mut batch = WriteBatch::new();
        let ordinal = stage_append(store, &mut batch, poll_id, voter).unwrap();
        store.commit(batch);
        ordinal
    }

    #[test]
    fn test_ordinals_are_dense_and_monotonic() {
        let mut store = MemStore::new();
        assert_eq!(append(&mut store, "1", "peer-a"), 1);
        assert_eq!(append(&mut store, "1", "peer-b"), 2);
        assert_eq!(append(&mut store, "1", "peer-c"), 3);
        assert_eq!(count(&store, "1").unwrap(), 3);
    }

    #[test]
    fn test_counters_are_per_poll() {
        let mut store = MemStore::new();
        assert_eq!(append(&mut store, "1", "peer-a"), 1);
        assert_eq!(append(&mut store, "2", "peer-a"), 1);
        assert_eq!(count(&store, "1").unwrap(), 1);
        assert_eq!(count(&store, "2").unwrap(), 1);
    }

    #[test]
    fn test_uncommitted_append_does_not_advance_counter() {
        let mut store = MemStore::new();
        let mut batch = WriteBatch::new();
        assert_eq!(stage_append(&store, &mut batch, "1", "peer-a").unwrap(), 1);
        drop(batch);
        assert_eq!(count(&store, "1").unwrap(), 0);
        // The next accepted vote reuses nothing and stays dense.
        assert_eq!(append(&mut store, "1", "peer-b"), 1);
    }

    #[test]
    fn test_enumerate_returns_voters_in_ordinal_order() {
        let mut store = MemStore::new();
        append(&mut store, "1", "peer-b");
        append(&mut store, "1", "peer-a");
        append(&mut store, "1", "peer-c");
        assert_eq!(
            enumerate(&store, "1").unwrap(),
            vec!["peer-b", "peer-a", "peer-c"]
        );
    }

    #[test]
    fn test_enumerate_skips_missing_index_entry() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut store = MemStore::new();
        // Counter says two votes but only ordinal 2 has an index entry.
        let mut batch = WriteBatch::new();
        batch.put(keys::vote_count("1"), store::encode(&2u64).unwrap());
        batch.put(
            keys::vote_addr("1", 2),
            store::encode(&"peer-b".to_string()).unwrap(),
        );
        store.commit(batch);

        assert_eq!(enumerate(&store, "1").unwrap(), vec!["peer-b"]);
    }
}
