//! Domain types and models

pub mod busy;
pub mod draft;
pub mod ids;
pub mod poll;
pub mod timestamp;

pub use busy::BusyInterval;
pub use draft::{PollDraft, SlotProposal, SlotToggle};
pub use ids::{ParticipantId, PollId, SlotId};
pub use poll::{Participant, Poll, TimeSlot, Vote, VoteType};
pub use timestamp::Timestamp;
