//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Optimistic update engine
/// Attempts per optimistic update before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Pause between conflicting attempts; zero retries immediately.
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 0;

// Object store layout
/// Poll `P` is stored as object `P.json`.
pub const POLL_OBJECT_SUFFIX: &str = ".json";
/// JSON API root for reads and listings.
pub const DEFAULT_STORE_API_BASE_URL: &str = "https://storage.googleapis.com/storage/v1";
/// Upload API root for writes.
pub const DEFAULT_STORE_UPLOAD_BASE_URL: &str = "https://storage.googleapis.com/upload/storage/v1";
/// Per-request store timeout.
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;

// Draft editing
/// Length of a slot added by a single calendar click.
pub const DEFAULT_SLOT_DURATION_MINUTES: u32 = 60;
/// Clicks this close to an existing slot start remove it.
pub const SLOT_TOGGLE_TOLERANCE_SECS: i64 = 60;

// External capabilities
/// Model used for suggestions and summaries.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
/// Generative Language API root.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Calendar API root.
pub const DEFAULT_CALENDAR_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";
/// Calendar read when none is configured.
pub const DEFAULT_CALENDAR_ID: &str = "primary";

// Logging
/// Fallback filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";
