//! Busy intervals reported by the creator's calendar

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::poll::TimeSlot;

/// Half-open interval `[start, end)` during which the creator is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusyInterval {
    /// Interval start.
    pub start: DateTime<Utc>,
    /// Interval end, exclusive.
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    /// Busy interval from `start` to `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, slot: &TimeSlot) -> bool {
        slot.start_time.instant() < self.end && self.start < slot.end_time.instant()
    }
}
