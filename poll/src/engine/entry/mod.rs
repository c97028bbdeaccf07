pub mod poll;
pub mod results;

pub use poll::Poll;
pub use results::{OptionTally, PollResults, PollSummary};
