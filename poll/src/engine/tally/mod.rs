//! Tally Module
//!
//! Read-side aggregation over stored polls and votes.

pub mod aggregator;
