//! Creator-side poll draft
//!
//! A draft is what the creator edits before committing: the descriptive
//! fields plus the candidate slots. It becomes a [`Poll`](super::Poll) only
//! through the creation/edit flow in `timealign-core`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::busy::BusyInterval;
use super::ids::SlotId;
use super::poll::{Poll, TimeSlot};
use crate::constants::SLOT_TOGGLE_TOLERANCE_SECS;
use crate::errors::{Result, TimeAlignError};

/// Slot proposed by an external suggester, before it gets an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotProposal {
    /// Proposed start.
    pub start_time: DateTime<Utc>,
    /// Proposed end.
    pub end_time: DateTime<Utc>,
}

/// Result of toggling a grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotToggle {
    /// New slot created at the clicked cell.
    Added(SlotId),
    /// Existing slot at the clicked cell was removed.
    Removed(SlotId),
}

/// Editable poll content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollDraft {
    /// Required before publishing.
    pub title: String,
    /// Free text; may be empty.
    pub description: String,
    /// Free text; blank means "no location".
    pub location: String,
    /// Author shown on the poll.
    pub creator_name: String,
    /// Candidate slots in display order.
    pub slots: Vec<TimeSlot>,
}

impl PollDraft {
    /// Empty draft with a title and author.
    pub fn new(title: impl Into<String>, creator_name: impl Into<String>) -> Self {
        Self { title: title.into(), creator_name: creator_name.into(), ..Self::default() }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Recover the editable content of a stored poll.
    pub fn from_poll(poll: &Poll) -> Self {
        Self {
            title: poll.title.clone(),
            description: poll.description.clone(),
            location: poll.location.clone().unwrap_or_default(),
            creator_name: poll.creator_name.clone(),
            slots: poll.slots.clone(),
        }
    }

    /// Local precondition check run before any store I/O.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(TimeAlignError::Validation("poll title must not be empty".into()));
        }
        if self.creator_name.trim().is_empty() {
            return Err(TimeAlignError::Validation("creator name must not be empty".into()));
        }
        if self.slots.is_empty() {
            return Err(TimeAlignError::Validation("poll needs at least one time slot".into()));
        }
        self.slots.iter().try_for_each(TimeSlot::validate)
    }

    /// Location as stored on the poll: trimmed, `None` when blank.
    pub fn location_option(&self) -> Option<String> {
        let trimmed = self.location.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Append a slot from `start` to `end` with a fresh id.
    pub fn add_slot(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<SlotId> {
        let slot = TimeSlot::new(start, end)?;
        let id = slot.id.clone();
        self.slots.push(slot);
        Ok(id)
    }

    /// Returns `true` if a slot was removed.
    pub fn remove_slot(&mut self, slot_id: &SlotId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| &slot.id != slot_id);
        self.slots.len() != before
    }

    /// Calendar-grid click: remove the slot starting within a minute of
    /// `start`, or add `[start, start + duration)` if there is none.
    pub fn toggle_slot(&mut self, start: DateTime<Utc>, duration: Duration) -> Result<SlotToggle> {
        let existing = self
            .slots
            .iter()
            .find(|slot| (slot.start_time.instant() - start).num_seconds().abs() < SLOT_TOGGLE_TOLERANCE_SECS)
            .map(|slot| slot.id.clone());

        match existing {
            Some(id) => {
                self.remove_slot(&id);
                Ok(SlotToggle::Removed(id))
            }
            None => self.add_slot(start, start + duration).map(SlotToggle::Added),
        }
    }

    /// Append suggested slots with fresh ids. Proposals that do not start
    /// before they end are skipped. Returns the number of slots added.
    pub fn extend_with_proposals(&mut self, proposals: &[SlotProposal]) -> usize {
        let before = self.slots.len();
        self.slots.extend(
            proposals
                .iter()
                .filter_map(|proposal| TimeSlot::new(proposal.start_time, proposal.end_time).ok()),
        );
        self.slots.len() - before
    }

    /// Slots that overlap any of the creator's busy intervals.
    pub fn conflicting_slots<'a>(&'a self, busy: &[BusyInterval]) -> Vec<&'a TimeSlot> {
        self.slots.iter().filter(|slot| busy.iter().any(|interval| interval.overlaps(slot))).collect()
    }
}
