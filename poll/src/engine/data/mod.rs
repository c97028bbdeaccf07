//! Data Layer Module
//!
//! This module defines the replicated key/value store contract and the
//! key layout used by the poll engine:
//! - `store`: point-lookup store trait, write batching, in-memory store

pub mod store;
