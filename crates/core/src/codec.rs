//! Poll document codec
//!
//! Stateless JSON encoding of the [`Poll`] aggregate. No normalization and no
//! default filling: an absent `location` decodes to `None`, and every other
//! field must be present.

use timealign_domain::constants::POLL_OBJECT_SUFFIX;
use timealign_domain::{Poll, PollId, Result, TimeAlignError};

/// Serialize a poll to its stored JSON payload.
pub fn encode(poll: &Poll) -> Result<Vec<u8>> {
    serde_json::to_vec(poll)
        .map_err(|e| TimeAlignError::Codec(format!("failed to encode poll {}: {}", poll.id, e)))
}

/// Parse a stored JSON payload back into a poll.
pub fn decode(bytes: &[u8]) -> Result<Poll> {
    serde_json::from_slice(bytes)
        .map_err(|e| TimeAlignError::Codec(format!("failed to decode poll document: {}", e)))
}

/// Object name under which a poll is stored.
pub fn object_name(poll_id: &PollId) -> String {
    format!("{}{}", poll_id, POLL_OBJECT_SUFFIX)
}
