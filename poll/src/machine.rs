//! State machine seam between the poll engine and the ordering layer.
//!
//! The cluster layer delivers committed log entries in a single agreed
//! sequence and calls `apply` for each one; it never constructs commands
//! itself. The trait is injected rather than subclassed so the core carries
//! no dependency on any particular consensus implementation.

/// Interface driven by the external total-order/broadcast layer.
///
/// Implementations must be deterministic: applying the same entries in the
/// same order to two instances must produce byte-identical snapshots.
pub trait StateMachine {
    /// Applies a committed log entry and returns the serialized reply for
    /// the caller that proposed it.
    fn apply(&mut self, index: u64, data: &[u8]) -> Vec<u8>;

    /// Creates a snapshot of the current state for log compaction.
    fn snapshot(&self) -> Vec<u8>;

    /// Restores state from a snapshot taken at `last_index`.
    fn on_snapshot(&mut self, last_index: u64, data: &[u8]);
}
