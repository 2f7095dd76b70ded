//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for TimeAlign
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TimeAlignError {
    /// No usable bearer token, or the store rejected the credentials.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Any store failure other than a generation mismatch or a missing object.
    #[error("Store error: {0}")]
    Store(String),

    /// Every attempt of an optimistic update lost the generation race.
    #[error("Could not save vote due to high contention after {attempts} attempts")]
    Contention { attempts: u32 },

    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller-side precondition failure, raised before any I/O.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    /// Failure reported by an external capability (slot suggestions, calendar).
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TimeAlignError {
    /// Stable label suitable for structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::Store(_) => "store",
            Self::Contention { .. } => "contention",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Codec(_) => "codec",
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Upstream(_) => "upstream",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for TimeAlign operations
pub type Result<T> = std::result::Result<T, TimeAlignError>;
