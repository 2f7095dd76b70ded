//! Configuration structures
//!
//! Everything a client needs is passed explicitly through these structs;
//! there is no process-wide configuration state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BACKOFF_BASE_MS, DEFAULT_CALENDAR_BASE_URL, DEFAULT_CALENDAR_ID,
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_LOG_LEVEL, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_STORE_API_BASE_URL, DEFAULT_STORE_TIMEOUT_SECS, DEFAULT_STORE_UPLOAD_BASE_URL,
};

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where poll documents live.
    pub store: StoreConfig,
    /// Optimistic update settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Slot suggestions and summaries; disabled when absent.
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
    /// Busy-time lookup; disabled when absent.
    #[serde(default)]
    pub calendar: Option<CalendarConfig>,
    /// `tracing` filter directive.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Object store location and transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Bucket holding one object per poll.
    pub bucket: String,
    /// JSON API root.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Upload API root.
    #[serde(default = "default_upload_base_url")]
    pub upload_base_url: String,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Transport-level attempts per request. Store failures are surfaced to
    /// the caller, so this stays at 1 unless explicitly raised.
    #[serde(default = "default_http_max_attempts")]
    pub http_max_attempts: usize,
}

impl StoreConfig {
    /// Default endpoints for `bucket`.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            api_base_url: default_api_base_url(),
            upload_base_url: default_upload_base_url(),
            timeout_secs: default_timeout_secs(),
            http_max_attempts: default_http_max_attempts(),
        }
    }

    /// Point both endpoints at one base URL (emulators, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base = base_url.into();
        self.api_base_url = format!("{base}/storage/v1");
        self.upload_base_url = format!("{base}/upload/storage/v1");
        self
    }

    /// Per-request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Optimistic update engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Attempts per update, first one included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base pause between conflicting attempts.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Randomize the pause.
    #[serde(default)]
    pub jitter: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
            jitter: false,
        }
    }
}

/// Gemini slot-suggestion and summary settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Generative Language API key.
    pub api_key: String,
    /// Model name.
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// API root.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

/// Calendar busy-time settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Calendar to read busy time from.
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    /// API root.
    #[serde(default = "default_calendar_base_url")]
    pub base_url: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self { calendar_id: default_calendar_id(), base_url: default_calendar_base_url() }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_STORE_API_BASE_URL.to_string()
}

fn default_upload_base_url() -> String {
    DEFAULT_STORE_UPLOAD_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_STORE_TIMEOUT_SECS
}

fn default_http_max_attempts() -> usize {
    1
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_backoff_base_ms() -> u64 {
    DEFAULT_BACKOFF_BASE_MS
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_gemini_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_calendar_id() -> String {
    DEFAULT_CALENDAR_ID.to_string()
}

fn default_calendar_base_url() -> String {
    DEFAULT_CALENDAR_BASE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[store]
bucket = "team-polls"
"#,
        )
        .unwrap();

        assert_eq!(config.store.bucket, "team-polls");
        assert_eq!(config.store.http_max_attempts, 1);
        assert_eq!(config.engine.max_attempts, 3);
        assert_eq!(config.engine.backoff_base_ms, 0);
        assert!(config.gemini.is_none());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn base_url_override_rewrites_both_endpoints() {
        let store = StoreConfig::new("b").with_base_url("http://127.0.0.1:4443");
        assert_eq!(store.api_base_url, "http://127.0.0.1:4443/storage/v1");
        assert_eq!(store.upload_base_url, "http://127.0.0.1:4443/upload/storage/v1");
    }
}
