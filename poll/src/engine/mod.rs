//! Poll Engine Module
//!
//! This module contains the core components of the replicated poll system:
//! - `data`: key/value store contract and key layout
//! - `entry`: persisted poll records and read-side views
//! - `error`: command failure values
//! - `pollengine`: command envelope decoding, dispatch, and snapshots
//! - `schema`: payload validation
//! - `tally`: read-side result aggregation
//! - `voting`: command processing and the vote ordinal index

pub mod data;
pub mod entry;
pub mod error;
pub mod pollengine;
pub mod schema;
pub mod tally;
pub mod voting;
