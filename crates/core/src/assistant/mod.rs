//! Slot suggestions, vote summaries and calendar conflict checks

pub mod ports;
pub mod service;

pub use ports::{BusyTimeProvider, SlotSuggester, SummaryProvider};
pub use service::PollAssistant;
