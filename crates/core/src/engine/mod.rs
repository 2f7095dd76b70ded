//! Concurrency-safe poll updates

pub mod retry;
pub mod service;

pub use retry::RetryPolicy;
pub use service::{AddVoteState, PollUpdateEngine};
