//! Poll fixtures shared by the integration tests.

use chrono::{DateTime, TimeZone, Utc};
use timealign_domain::{
    Participant, ParticipantId, Poll, PollDraft, PollId, SlotId, TimeSlot, Vote, VoteType,
};

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, hour, 0, 0).unwrap()
}

/// Two-slot poll (`s1`, `s2`) with no participants.
pub fn sample_poll(id: &str) -> Poll {
    Poll {
        id: PollId::new(id),
        title: "Quarterly planning".into(),
        description: "Pick a slot".into(),
        location: Some("Room 4".into()),
        created_at: Utc.with_ymd_and_hms(2025, 5, 30, 16, 45, 12).unwrap().into(),
        creator_name: "Dana".into(),
        slots: vec![
            TimeSlot::with_id(SlotId::new("s1"), at(9), at(10)).unwrap(),
            TimeSlot::with_id(SlotId::new("s2"), at(14), at(15)).unwrap(),
        ],
        participants: Vec::new(),
    }
}

pub fn voter(name: &str, votes: &[(&str, VoteType)]) -> Participant {
    Participant {
        id: ParticipantId::new(format!("{}-id", name.to_lowercase())),
        name: name.into(),
        votes: votes.iter().map(|(slot, vote_type)| Vote::new(*slot, *vote_type)).collect(),
    }
}

pub fn draft_with_slot(title: &str) -> PollDraft {
    let mut draft = PollDraft::new(title, "Dana").with_description("Pick a slot");
    draft.add_slot(at(9), at(10)).unwrap();
    draft
}
