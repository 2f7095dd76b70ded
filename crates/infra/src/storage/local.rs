//! Single-process poll store backed by one JSON file
//!
//! The file holds a `{pollId: Poll}` map. Every call reads and rewrites the
//! whole file with no locking or generation check, so two processes sharing
//! the file can lose each other's votes. Use [`super::GcsObjectStore`] behind
//! the update engine whenever more than one writer exists.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use timealign_core::merge;
use timealign_domain::{Participant, Poll, PollId, Result, TimeAlignError};
use tracing::{debug, instrument};

use crate::errors::InfraError;

type PollMap = BTreeMap<String, Poll>;

/// Poll store kept in a local JSON file
#[derive(Debug, Clone)]
pub struct LocalPollStore {
    path: PathBuf,
}

impl LocalPollStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or replace the poll under its id.
    #[instrument(skip(self, poll), fields(poll_id = %poll.id))]
    pub async fn save_poll(&self, poll: &Poll) -> Result<()> {
        let mut polls = self.load().await?;
        polls.insert(poll.id.as_str().to_string(), poll.clone());
        self.store(&polls).await
    }

    /// Poll with id `poll_id`, if saved.
    pub async fn get_poll(&self, poll_id: &PollId) -> Result<Option<Poll>> {
        Ok(self.load().await?.remove(poll_id.as_str()))
    }

    /// All stored polls, newest first.
    pub async fn list_polls(&self) -> Result<Vec<Poll>> {
        let mut polls: Vec<Poll> = self.load().await?.into_values().collect();
        polls.sort_by(|a, b| b.created_at.instant().cmp(&a.created_at.instant()));
        Ok(polls)
    }

    /// Merge a participant's votes by name. `Ok(None)` if the poll is unknown.
    #[instrument(skip(self, participant), fields(poll_id = %poll_id, participant = %participant.name))]
    pub async fn add_participant_vote(
        &self,
        poll_id: &PollId,
        participant: Participant,
    ) -> Result<Option<Poll>> {
        participant.validate()?;

        let mut polls = self.load().await?;
        let Some(mut poll) = polls.remove(poll_id.as_str()) else {
            return Ok(None);
        };

        let current = std::mem::take(&mut poll.participants);
        let poll = poll.with_participants(merge(current, participant));

        polls.insert(poll_id.as_str().to_string(), poll.clone());
        self.store(&polls).await?;
        Ok(Some(poll))
    }

    async fn load(&self) -> Result<PollMap> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(PollMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| InfraError::from(e).into()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "poll file missing, starting empty");
                Ok(PollMap::new())
            }
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    async fn store(&self, polls: &PollMap) -> Result<()> {
        let bytes = serde_json::to_vec(polls).map_err(|e| TimeAlignError::from(InfraError::from(e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| TimeAlignError::from(InfraError::from(e)))?;
        }

        // Readers see either the old file or the new one.
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, bytes).await.map_err(|e| TimeAlignError::from(InfraError::from(e)))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| TimeAlignError::from(InfraError::from(e)))?;

        debug!(path = %self.path.display(), polls = polls.len(), "poll file written");
        Ok(())
    }
}
