//! # TimeAlign Domain
//!
//! Business domain types and models for TimeAlign scheduling polls.
//!
//! This crate contains:
//! - The poll aggregate (Poll, TimeSlot, Participant, Vote)
//! - Creator-side draft editing helpers
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other TimeAlign crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
