//! # TimeAlign Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The Cloud Storage object store (generation-checked reads and writes)
//! - A single-process JSON file store
//! - Gemini slot suggestions and vote summaries
//! - Google Calendar busy-time lookups
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `timealign-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;
pub mod storage;

// Re-export commonly used items
pub use auth::StaticTokenProvider;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::calendar::GoogleCalendarBusyTime;
pub use integrations::gemini::{GeminiClient, GeminiError};
pub use observability::{init_tracing, LogFormat};
pub use storage::{GcsObjectStore, LocalPollStore};
