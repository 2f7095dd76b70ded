//! Optimistic update engine
//!
//! Owns every read-mutate-write cycle on a poll document. Votes go through a
//! compare-and-swap loop on the document generation; creator commits
//! overwrite unconditionally.

use std::sync::Arc;

use timealign_domain::{impl_wire_enum_conversions, Participant, Poll, PollId, Result, TimeAlignError};
use tracing::{debug, info, instrument, warn};

use super::retry::RetryPolicy;
use crate::storage::{Generation, Versioned, VersionedStore, WriteOutcome};
use crate::voting::merge;

/// Observable states of an `add_vote` call.
///
/// `Reading → Merging → Writing → {Committed | Conflicted}`, then
/// `Conflicted → Reading` while attempts remain, else `Exhausted`.
/// `Committed`, `Exhausted` and `NotFound` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddVoteState {
    /// Fetching the current document and generation.
    Reading,
    /// Applying the vote to the fetched participants.
    Merging,
    /// Conditional write against the fetched generation.
    Writing,
    /// The write landed.
    Committed,
    /// The generation moved on; a fresh read follows if allowed.
    Conflicted,
    /// Every allowed attempt conflicted.
    Exhausted,
    /// The poll does not exist.
    NotFound,
}

impl_wire_enum_conversions!(AddVoteState {
    Reading => "READING",
    Merging => "MERGING",
    Writing => "WRITING",
    Committed => "COMMITTED",
    Conflicted => "CONFLICTED",
    Exhausted => "EXHAUSTED",
    NotFound => "NOT_FOUND",
});

impl AddVoteState {
    /// `Committed`, `Exhausted` and `NotFound` end the loop.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::Exhausted | Self::NotFound)
    }
}

/// Non-terminal steps, each carrying what the next transition needs.
enum Step {
    Reading,
    Merging(Versioned<Poll>),
    Writing { candidate: Poll, generation: Generation },
    Conflicted,
}

impl Step {
    fn state(&self) -> AddVoteState {
        match self {
            Self::Reading => AddVoteState::Reading,
            Self::Merging(_) => AddVoteState::Merging,
            Self::Writing { .. } => AddVoteState::Writing,
            Self::Conflicted => AddVoteState::Conflicted,
        }
    }
}

/// Poll update engine
///
/// Holds no poll state between calls: every operation starts from a fresh
/// read of the store.
pub struct PollUpdateEngine {
    store: Arc<dyn VersionedStore<Poll>>,
    retry: RetryPolicy,
}

impl PollUpdateEngine {
    /// Create an engine with the default policy (three attempts, no delay).
    pub fn new(store: Arc<dyn VersionedStore<Poll>>) -> Self {
        Self { store, retry: RetryPolicy::default() }
    }

    /// Replace the default three-attempt policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Policy applied to generation conflicts.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Read the current poll, if it exists.
    #[instrument(skip(self), fields(poll_id = %poll_id))]
    pub async fn fetch(&self, poll_id: &PollId) -> Result<Option<Poll>> {
        Ok(self.store.read(poll_id.as_str()).await?.map(|versioned| versioned.value))
    }

    /// Write the whole poll unconditionally (creation and creator edits).
    ///
    /// No merge with concurrent votes is attempted: a vote committed between
    /// the creator's read and this write is overwritten.
    #[instrument(skip(self, poll), fields(poll_id = %poll.id))]
    pub async fn create_or_replace(&self, poll: &Poll) -> Result<()> {
        self.store.overwrite(poll.id.as_str(), poll).await?;
        info!(slots = poll.slots.len(), participants = poll.participants.len(), "poll written");
        Ok(())
    }

    /// Upsert `participant`'s votes into the poll under generation checks.
    ///
    /// Returns the committed poll, or `Ok(None)` if the poll does not exist.
    /// Fails with [`TimeAlignError::Contention`] once every attempt lost its
    /// race; any other store failure is returned immediately.
    #[instrument(skip(self, participant), fields(poll_id = %poll_id, participant = %participant.name))]
    pub async fn add_vote(&self, poll_id: &PollId, participant: Participant) -> Result<Option<Poll>> {
        participant.validate()?;

        let mut attempts: u32 = 0;
        let mut step = Step::Reading;

        loop {
            debug!(state = %step.state(), attempt = attempts, "add_vote transition");

            step = match step {
                Step::Reading => {
                    attempts += 1;
                    match self.store.read(poll_id.as_str()).await? {
                        Some(snapshot) => Step::Merging(snapshot),
                        None => {
                            debug!(state = %AddVoteState::NotFound, attempt = attempts, "poll missing");
                            return Ok(None);
                        }
                    }
                }
                Step::Merging(Versioned { value: mut poll, generation }) => {
                    let current = std::mem::take(&mut poll.participants);
                    let candidate = poll.with_participants(merge(current, participant.clone()));
                    Step::Writing { candidate, generation }
                }
                Step::Writing { candidate, generation } => {
                    match self.store.write_if_version(poll_id.as_str(), &candidate, &generation).await? {
                        WriteOutcome::Committed => {
                            info!(
                                state = %AddVoteState::Committed,
                                attempt = attempts,
                                generation = %generation,
                                "vote committed"
                            );
                            return Ok(Some(candidate));
                        }
                        WriteOutcome::Conflict => Step::Conflicted,
                    }
                }
                Step::Conflicted => {
                    if !self.retry.allows_another(attempts) {
                        warn!(state = %AddVoteState::Exhausted, attempts, "giving up on contended poll");
                        return Err(TimeAlignError::Contention { attempts });
                    }

                    warn!(attempt = attempts, "generation precondition failed, retrying from fresh read");
                    let delay = self.retry.delay_before(attempts + 1);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    Step::Reading
                }
            };
        }
    }
}
