use serde::{Deserialize, Serialize};

/// One option of a poll with its accumulated vote count, in the order the
/// options were given at creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionTally {
    pub label: String,
    pub votes: u64,
}

/// Full read-side view of a single poll.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollResults {
    pub poll_id: String,
    pub question: String,
    pub options: Vec<OptionTally>,
    pub total_votes: u64,
    pub closed: bool,
}

/// One line of the poll listing, in ascending poll id order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollSummary {
    pub poll_id: String,
    pub question: String,
    pub total_votes: u64,
    pub closed: bool,
}
