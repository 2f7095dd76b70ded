//! Ports for the creator-side assistant capabilities

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use timealign_domain::{BusyInterval, Participant, Result, SlotProposal, TimeSlot};

/// Turns a natural-language request into candidate slots.
#[async_trait]
pub trait SlotSuggester: Send + Sync {
    /// `reference_date` anchors relative phrases such as "next Tuesday";
    /// `duration_minutes` applies when the prompt names no length.
    async fn suggest_slots(
        &self,
        prompt: &str,
        reference_date: NaiveDate,
        duration_minutes: u32,
    ) -> Result<Vec<SlotProposal>>;
}

/// Writes a short recommendation from a poll's current votes.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    async fn summarize(&self, slots: &[TimeSlot], participants: &[Participant]) -> Result<String>;
}

/// Trait for busy-time lookups on the creator's calendar
#[async_trait]
pub trait BusyTimeProvider: Send + Sync {
    /// Busy intervals overlapping `[start, end)`.
    async fn busy_intervals(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>>;
}
