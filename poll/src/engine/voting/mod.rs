//! Voting Module
//!
//! This module holds the write-side of the poll state machine:
//! - `command_processor`: applies poll commands against the store
//! - `vote_index`: dense ordinal index enabling vote enumeration

pub mod command_processor;
pub mod vote_index;

pub use command_processor::CommandProcessor;
