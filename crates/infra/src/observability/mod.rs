//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events. Hosts call [`init_tracing`] once
//! at startup; `RUST_LOG` overrides the configured level when set.

use timealign_domain::{Result, TimeAlignError};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, registry, EnvFilter};

/// Output format for the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Filter directives: `RUST_LOG` when non-blank, otherwise `default_level`
/// applied to the TimeAlign crates only.
pub fn filter_directives(default_level: &str) -> String {
    match std::env::var("RUST_LOG") {
        Ok(value) if !value.trim().is_empty() => value,
        _ => format!(
            "timealign_domain={level},timealign_core={level},timealign_infra={level}",
            level = default_level.trim()
        ),
    }
}

/// Install the global subscriber.
///
/// # Errors
/// `Config` if the directives do not parse or a subscriber is already set.
pub fn init_tracing(default_level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::builder()
        .parse(filter_directives(default_level))
        .map_err(|e| TimeAlignError::Config(format!("invalid log filter: {}", e)))?;

    let installed = match format {
        LogFormat::Pretty => registry().with(filter).with(fmt::layer()).try_init(),
        LogFormat::Json => registry().with(filter).with(fmt::layer().json()).try_init(),
    };

    installed.map_err(|e| TimeAlignError::Config(format!("tracing already initialised: {}", e)))
}
