use thiserror::Error;

/// Failure outcome of a single command application.
///
/// Every variant is returned as a value; a rejected command never stops the
/// apply loop or leaves partial writes behind. `Store` covers failures
/// outside the enumerated business rules (corrupt record, codec failure)
/// and is fatal to that one command only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PollError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("poll {0} does not exist")]
    NotFound(String),

    #[error("poll {0} is closed")]
    ClosedPoll(String),

    #[error("invalid option for poll: {0}")]
    InvalidOption(String),

    #[error("identity {1} has already voted on poll {0}")]
    DuplicateVote(String, String),

    #[error("store failure: {0}")]
    Store(String),
}

impl PollError {
    /// Stable machine-readable kind carried in replies.
    pub fn kind(&self) -> &'static str {
        match self {
            PollError::Validation(_) => "validation_error",
            PollError::NotFound(_) => "not_found",
            PollError::ClosedPoll(_) => "closed_poll",
            PollError::InvalidOption(_) => "invalid_option",
            PollError::DuplicateVote(_, _) => "duplicate_vote",
            PollError::Store(_) => "store_error",
        }
    }
}
