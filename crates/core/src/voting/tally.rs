//! Per-slot vote counts and best-slot selection

use chrono::{DateTime, Utc};
use timealign_domain::{Poll, SlotId, VoteType};

/// Vote counts for one slot. Participants who expressed nothing for the slot
/// are not counted anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTally {
    /// Slot the counts belong to.
    pub slot_id: SlotId,
    /// Parsed slot start.
    pub start_time: DateTime<Utc>,
    /// Parsed slot end.
    pub end_time: DateTime<Utc>,
    /// Explicit YES votes.
    pub yes: usize,
    /// Explicit MAYBE votes.
    pub maybe: usize,
    /// Explicit NO votes.
    pub no: usize,
}

impl SlotTally {
    /// `yes + maybe / 2`, doubled to stay in integers.
    fn doubled_score(&self) -> usize {
        2 * self.yes + self.maybe
    }

    /// `yes + 0.5 * maybe`.
    pub fn score(&self) -> f64 {
        self.doubled_score() as f64 / 2.0
    }
}

/// Count votes per slot, in slot order. Votes for slot ids that are not on
/// the poll (removed during an edit) are ignored.
pub fn tally(poll: &Poll) -> Vec<SlotTally> {
    poll.slots
        .iter()
        .map(|slot| {
            let mut counts = SlotTally {
                slot_id: slot.id.clone(),
                start_time: slot.start_time.instant(),
                end_time: slot.end_time.instant(),
                yes: 0,
                maybe: 0,
                no: 0,
            };
            for vote_type in poll.participants.iter().filter_map(|p| p.vote_for(&slot.id)) {
                match vote_type {
                    VoteType::Yes => counts.yes += 1,
                    VoteType::Maybe => counts.maybe += 1,
                    VoteType::No => counts.no += 1,
                }
            }
            counts
        })
        .collect()
}

/// Highest score wins; ties go to fewer NO votes, then to the earlier slot.
pub fn best_slot(poll: &Poll) -> Option<SlotTally> {
    tally(poll).into_iter().fold(None, |best, candidate| match best {
        None => Some(candidate),
        Some(current) => {
            let better = candidate.doubled_score() > current.doubled_score()
                || (candidate.doubled_score() == current.doubled_score()
                    && candidate.no < current.no);
            Some(if better { candidate } else { current })
        }
    })
}
