//! Poll aggregate and its parts
//!
//! The [`Poll`] is the unit of storage and of concurrency control: it is
//! always read and written whole. Field names follow the stored JSON document
//! (`camelCase`, vote types upper-case).

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ParticipantId, PollId, SlotId};
use super::timestamp::Timestamp;
use crate::errors::{Result, TimeAlignError};
use crate::impl_wire_enum_conversions;

/// Candidate meeting interval within a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    /// Stable id votes refer to.
    pub id: SlotId,
    /// Slot start as written in the document.
    pub start_time: Timestamp,
    /// Slot end as written in the document.
    pub end_time: Timestamp,
}

impl TimeSlot {
    /// Create a slot with a fresh id. Rejects empty or inverted intervals.
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Result<Self> {
        Self::with_id(SlotId::generate(), start_time, end_time)
    }

    /// Slot with a caller-chosen id.
    pub fn with_id(id: SlotId, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Result<Self> {
        let slot = Self { id, start_time: start_time.into(), end_time: end_time.into() };
        slot.validate()?;
        Ok(slot)
    }

    /// Reject slots that do not end after they start.
    pub fn validate(&self) -> Result<()> {
        if self.start_time.instant() >= self.end_time.instant() {
            return Err(TimeAlignError::Validation(format!(
                "slot {} must start before it ends ({} >= {})",
                self.id, self.start_time, self.end_time
            )));
        }
        Ok(())
    }

    /// Time between start and end.
    pub fn duration(&self) -> chrono::Duration {
        self.end_time.instant() - self.start_time.instant()
    }
}

/// A participant's answer for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoteType {
    /// Available.
    Yes,
    /// Available if needed.
    Maybe,
    /// Not available.
    No,
}

impl_wire_enum_conversions!(VoteType {
    Yes => "YES",
    Maybe => "MAYBE",
    No => "NO",
});

/// Vote on a single slot. A slot with no vote is "not expressed", which is
/// different from an explicit [`VoteType::No`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    /// Slot the vote is for.
    pub slot_id: SlotId,
    /// Answer given.
    #[serde(rename = "type")]
    pub vote_type: VoteType,
}

impl Vote {
    /// Vote of `vote_type` on `slot_id`.
    pub fn new(slot_id: impl Into<SlotId>, vote_type: VoteType) -> Self {
        Self { slot_id: slot_id.into(), vote_type }
    }
}

/// Anonymous voter, identified for merge purposes by `name` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Id assigned on first vote.
    pub id: ParticipantId,
    /// Display name; matched case-insensitively.
    pub name: String,
    /// At most one vote per slot.
    pub votes: Vec<Vote>,
}

impl Participant {
    /// Build a validated participant with a fresh id.
    pub fn new(name: impl Into<String>, votes: Vec<Vote>) -> Result<Self> {
        let participant = Self { id: ParticipantId::generate(), name: name.into(), votes };
        participant.validate()?;
        Ok(participant)
    }

    /// Name must be non-blank and at most one vote may reference each slot.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TimeAlignError::Validation("participant name must not be empty".into()));
        }

        let mut seen = HashSet::with_capacity(self.votes.len());
        for vote in &self.votes {
            if !seen.insert(&vote.slot_id) {
                return Err(TimeAlignError::Validation(format!(
                    "participant '{}' voted more than once on slot {}",
                    self.name, vote.slot_id
                )));
            }
        }
        Ok(())
    }

    /// This participant's vote on `slot_id`, if any.
    pub fn vote_for(&self, slot_id: &SlotId) -> Option<VoteType> {
        self.votes.iter().find(|vote| &vote.slot_id == slot_id).map(|vote| vote.vote_type)
    }
}

/// One scheduling request and every vote cast on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    /// Also the object name, minus `.json`.
    pub id: PollId,
    /// Short name shown in lists.
    pub title: String,
    /// Free text; may be empty.
    pub description: String,
    /// Omitted from the document when blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Set once at creation, never rewritten.
    pub created_at: Timestamp,
    /// Name of whoever created the poll.
    pub creator_name: String,
    /// Candidate slots in display order.
    pub slots: Vec<TimeSlot>,
    /// Everyone who has voted.
    pub participants: Vec<Participant>,
}

impl Poll {
    /// Replace the participant list, keeping every other field.
    pub fn with_participants(self, participants: Vec<Participant>) -> Self {
        Self { participants, ..self }
    }

    /// Slot with id `slot_id`, if the poll still has it.
    pub fn slot(&self, slot_id: &SlotId) -> Option<&TimeSlot> {
        self.slots.iter().find(|slot| &slot.id == slot_id)
    }

    /// Exact, case-sensitive name lookup.
    pub fn participant_named(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|participant| participant.name == name)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()
    }

    #[test]
    fn slot_rejects_inverted_interval() {
        assert!(TimeSlot::new(at(10), at(11)).is_ok());
        assert!(matches!(TimeSlot::new(at(11), at(10)), Err(TimeAlignError::Validation(_))));
        assert!(matches!(TimeSlot::new(at(10), at(10)), Err(TimeAlignError::Validation(_))));
    }

    #[test]
    fn vote_type_uses_upper_case_tokens() {
        let vote = Vote::new("s1", VoteType::Maybe);
        let json = serde_json::to_value(&vote).unwrap();
        assert_eq!(json, serde_json::json!({"slotId": "s1", "type": "MAYBE"}));
        assert_eq!(VoteType::Yes.to_string(), "YES");
        assert_eq!("no".parse::<VoteType>().unwrap(), VoteType::No);
    }

    #[test]
    fn participant_requires_name_and_unique_slots() {
        assert!(Participant::new("  ", vec![]).is_err());
        let dup = vec![Vote::new("s1", VoteType::Yes), Vote::new("s1", VoteType::No)];
        assert!(Participant::new("Alice", dup).is_err());

        let alice = Participant::new("Alice", vec![Vote::new("s1", VoteType::No)]).unwrap();
        assert_eq!(alice.vote_for(&SlotId::new("s1")), Some(VoteType::No));
        assert_eq!(alice.vote_for(&SlotId::new("s2")), None);
    }

    #[test]
    fn absent_location_is_not_serialized() {
        let poll = Poll {
            id: PollId::new("p1"),
            title: "Sync".into(),
            description: String::new(),
            location: None,
            created_at: at(9).into(),
            creator_name: "Dana".into(),
            slots: vec![],
            participants: vec![],
        };
        let json = serde_json::to_value(&poll).unwrap();
        assert!(json.get("location").is_none());
        assert_eq!(json["creatorName"], "Dana");
        assert_eq!(json["createdAt"], "2025-03-10T09:00:00.000Z");
    }

    #[test]
    fn slot_from_document_keeps_its_text() {
        let json = r#"{"id":"a","startTime":"2025-06-02T12:00:00.000+02:00","endTime":"2025-06-02T11:00:00Z"}"#;
        let slot: TimeSlot = serde_json::from_str(json).unwrap();

        assert_eq!(slot.duration(), chrono::Duration::hours(1));
        assert!(slot.validate().is_ok());
        assert_eq!(serde_json::to_string(&slot).unwrap(), json);
    }
}
