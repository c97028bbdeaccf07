//! Deterministic poll state machine for a replicated key/value store.
//!
//! Peers agree on poll state (creation, votes, tallies) by applying the same
//! ordered stream of commands to local replicas; every correct replica
//! converges to bit-identical store contents. This crate is only the state
//! machine core: command ordering, transport, and identity verification are
//! the responsibility of the surrounding cluster layer, which drives the
//! [`StateMachine`] trait with already-ordered, already-authenticated
//! commands.

pub mod config;
pub mod engine;
pub mod machine;
pub mod state_poll;

pub use machine::StateMachine;
pub use state_poll::StatePoll;
