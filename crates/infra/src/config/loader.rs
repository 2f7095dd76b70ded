//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the bucket is not set there, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `TIMEALIGN_STORE_BUCKET`: Bucket holding poll documents (required)
//! - `TIMEALIGN_STORE_API_BASE_URL` / `TIMEALIGN_STORE_UPLOAD_BASE_URL`:
//!   Object store endpoints
//! - `TIMEALIGN_STORE_TIMEOUT_SECS`: Per-request timeout
//! - `TIMEALIGN_STORE_HTTP_MAX_ATTEMPTS`: Transport attempts per request
//! - `TIMEALIGN_ENGINE_MAX_ATTEMPTS`: Optimistic update attempts
//! - `TIMEALIGN_ENGINE_BACKOFF_MS`: Base delay between attempts
//! - `TIMEALIGN_ENGINE_JITTER`: Randomise delays (true/false)
//! - `TIMEALIGN_GEMINI_API_KEY`: Enables slot suggestions and summaries
//! - `TIMEALIGN_GEMINI_MODEL` / `TIMEALIGN_GEMINI_BASE_URL`
//! - `TIMEALIGN_CALENDAR_ID`: Enables busy-time lookups on that calendar
//! - `TIMEALIGN_CALENDAR_BASE_URL`
//! - `TIMEALIGN_LOG_LEVEL`: Default tracing filter
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./timealign.json` or `./timealign.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use timealign_domain::constants::{
    DEFAULT_CALENDAR_BASE_URL, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_LOG_LEVEL,
};
use timealign_domain::{
    CalendarConfig, Config, EngineConfig, GeminiConfig, Result, StoreConfig, TimeAlignError,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// bucket variable is missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `TimeAlignError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `TIMEALIGN_STORE_BUCKET` is required; everything else falls back to
/// the defaults of the domain config structs.
///
/// # Errors
/// Returns `TimeAlignError::Config` if the bucket is missing or a numeric
/// variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let mut store = StoreConfig::new(env_var("TIMEALIGN_STORE_BUCKET")?);
    if let Some(url) = env_opt("TIMEALIGN_STORE_API_BASE_URL") {
        store.api_base_url = url;
    }
    if let Some(url) = env_opt("TIMEALIGN_STORE_UPLOAD_BASE_URL") {
        store.upload_base_url = url;
    }
    if let Some(secs) = env_parse("TIMEALIGN_STORE_TIMEOUT_SECS")? {
        store.timeout_secs = secs;
    }
    if let Some(attempts) = env_parse("TIMEALIGN_STORE_HTTP_MAX_ATTEMPTS")? {
        store.http_max_attempts = attempts;
    }

    let defaults = EngineConfig::default();
    let engine = EngineConfig {
        max_attempts: env_parse("TIMEALIGN_ENGINE_MAX_ATTEMPTS")?.unwrap_or(defaults.max_attempts),
        backoff_base_ms: env_parse("TIMEALIGN_ENGINE_BACKOFF_MS")?
            .unwrap_or(defaults.backoff_base_ms),
        jitter: env_bool("TIMEALIGN_ENGINE_JITTER", defaults.jitter),
    };

    let gemini = env_opt("TIMEALIGN_GEMINI_API_KEY").map(|api_key| GeminiConfig {
        api_key,
        model: env_opt("TIMEALIGN_GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
        base_url: env_opt("TIMEALIGN_GEMINI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.into()),
    });

    let calendar = env_opt("TIMEALIGN_CALENDAR_ID").map(|calendar_id| CalendarConfig {
        calendar_id,
        base_url: env_opt("TIMEALIGN_CALENDAR_BASE_URL")
            .unwrap_or_else(|| DEFAULT_CALENDAR_BASE_URL.into()),
    });

    Ok(Config {
        store,
        engine,
        gemini,
        calendar,
        log_level: env_opt("TIMEALIGN_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.into()),
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `TimeAlignError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TimeAlignError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TimeAlignError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TimeAlignError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration, detecting the format from the file extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TimeAlignError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TimeAlignError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(TimeAlignError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Returns the first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut bases = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        bases.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        bases.push(exe_dir);
    }

    bases.iter().flat_map(|base| candidates_in(base)).find(|path| path.exists())
}

fn candidates_in(base: &Path) -> Vec<PathBuf> {
    vec![
        base.join("config.json"),
        base.join("config.toml"),
        base.join("timealign.json"),
        base.join("timealign.toml"),
        base.join("../config.json"),
        base.join("../config.toml"),
        base.join("../../config.json"),
        base.join("../../config.toml"),
    ]
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        TimeAlignError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Non-empty environment variable, if set.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| TimeAlignError::Config(format!("Invalid value for {}: {}", key, e)))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
