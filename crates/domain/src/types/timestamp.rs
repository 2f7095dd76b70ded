//! Wire timestamps
//!
//! Stored documents carry ISO 8601 strings written by whichever client last
//! touched them (`2025-06-02T12:00:00.000+02:00`, `...Z`, with or without
//! fractions). A [`Timestamp`] keeps that text verbatim so rewriting a poll
//! never changes timestamps it did not mean to change; the parsed instant is
//! only used for comparisons.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::TimeAlignError;

/// ISO 8601 instant that serializes back to the exact text it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp {
    raw: String,
    instant: DateTime<Utc>,
}

impl Timestamp {
    /// Parse RFC 3339 text, keeping it as-is for serialization.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TimeAlignError> {
        let raw = raw.into();
        let instant = DateTime::parse_from_rfc3339(&raw)
            .map_err(|e| TimeAlignError::Codec(format!("invalid timestamp {:?}: {}", raw, e)))?
            .with_timezone(&Utc);
        Ok(Self { raw, instant })
    }

    /// Parsed instant, in UTC.
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Text exactly as read or generated.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Formats like a browser `toISOString()`: UTC, milliseconds, `Z`.
impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self { raw: instant.to_rfc3339_opts(SecondsFormat::Millis, true), instant }
    }
}

impl FromStr for Timestamp {
    type Err = TimeAlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq<DateTime<Utc>> for Timestamp {
    fn eq(&self, other: &DateTime<Utc>) -> bool {
        self.instant == *other
    }
}

// Instant first; the text only separates equal instants written differently.
impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant).then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}
