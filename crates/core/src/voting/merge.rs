//! Vote merge policy
//!
//! Upsert by exact participant name. A resubmission replaces the previous
//! entry wholesale, so slots the participant un-voted simply disappear. New
//! names are appended, which keeps the list in first-vote order.

use timealign_domain::Participant;

/// Merge `incoming` into `participants`.
pub fn merge(mut participants: Vec<Participant>, incoming: Participant) -> Vec<Participant> {
    match participants.iter().position(|existing| existing.name == incoming.name) {
        Some(index) => participants[index] = incoming,
        None => participants.push(incoming),
    }
    participants
}
