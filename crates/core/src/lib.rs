//! # TimeAlign Core
//!
//! Poll business logic - no HTTP, no filesystem.
//!
//! This crate contains:
//! - Port interfaces (traits) for storage, auth and assistant capabilities
//! - The poll document codec and the vote merge policy
//! - The optimistic update engine and the creation/edit flow
//!
//! ## Architecture Principles
//! - Only depends on `timealign-domain`
//! - All external dependencies via traits
//! - Concurrency correctness lives in [`engine`], against [`storage::VersionedStore`]

pub mod assistant;
pub mod authoring;
pub mod codec;
pub mod engine;
pub mod storage;
pub mod voting;

// Infrastructure ports
pub mod auth_ports;

pub use assistant::{BusyTimeProvider, PollAssistant, SlotSuggester, SummaryProvider};
pub use auth_ports::BearerTokenProvider;
pub use authoring::PollAuthoringService;
pub use engine::{AddVoteState, PollUpdateEngine, RetryPolicy};
pub use storage::{
    Generation, ObjectStore, PollDocumentStore, StoredObject, Versioned, VersionedStore,
    WriteOutcome,
};
pub use voting::{best_slot, merge, tally, SlotTally};
