//! Gemini integration for slot suggestions and vote summaries

pub mod client;
pub mod types;

pub use client::GeminiClient;
pub use types::GeminiError;
