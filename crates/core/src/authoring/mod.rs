//! Poll creation and edit flow
//!
//! Turns a creator's [`PollDraft`] into a stored poll. Both paths validate the
//! draft locally and then replace the whole document through the update
//! engine.

use std::sync::Arc;

use chrono::Utc;
use timealign_domain::{Poll, PollDraft, PollId, Result, TimeAlignError};
use tracing::{info, instrument};

use crate::engine::PollUpdateEngine;

/// Poll authoring service
pub struct PollAuthoringService {
    engine: Arc<PollUpdateEngine>,
}

impl PollAuthoringService {
    /// Authoring flow writing through `engine`.
    pub fn new(engine: Arc<PollUpdateEngine>) -> Self {
        Self { engine }
    }

    /// Create a new poll with a fresh id, the current time as `createdAt` and
    /// no participants.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create_poll(&self, draft: &PollDraft) -> Result<Poll> {
        draft.validate()?;

        let poll = Poll {
            id: PollId::generate(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            location: draft.location_option(),
            created_at: Utc::now().into(),
            creator_name: draft.creator_name.clone(),
            slots: draft.slots.clone(),
            participants: Vec::new(),
        };

        self.engine.create_or_replace(&poll).await?;
        info!(poll_id = %poll.id, "poll created");
        Ok(poll)
    }

    /// Replace the editable content of an existing poll.
    ///
    /// `id`, `createdAt` and `participants` come from a fresh read. The write
    /// is unconditional, so votes committed after that read are lost.
    #[instrument(skip(self, draft), fields(poll_id = %poll_id))]
    pub async fn edit_poll(&self, poll_id: &PollId, draft: &PollDraft) -> Result<Poll> {
        draft.validate()?;

        let existing = self
            .engine
            .fetch(poll_id)
            .await?
            .ok_or_else(|| TimeAlignError::NotFound(format!("poll {}", poll_id)))?;

        let poll = Poll {
            id: existing.id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            location: draft.location_option(),
            created_at: existing.created_at,
            creator_name: draft.creator_name.clone(),
            slots: draft.slots.clone(),
            participants: existing.participants,
        };

        self.engine.create_or_replace(&poll).await?;
        info!(slots = poll.slots.len(), "poll edited");
        Ok(poll)
    }

    /// Load a stored poll back into an editable draft.
    pub async fn load_draft(&self, poll_id: &PollId) -> Result<Option<PollDraft>> {
        Ok(self.engine.fetch(poll_id).await?.as_ref().map(PollDraft::from_poll))
    }
}
