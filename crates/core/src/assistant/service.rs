//! Creator-side assistant service

use std::sync::Arc;

use chrono::NaiveDate;
use timealign_domain::constants::DEFAULT_SLOT_DURATION_MINUTES;
use timealign_domain::{Poll, PollDraft, Result, SlotId, TimeAlignError};
use tracing::{debug, instrument, warn};

use super::ports::{BusyTimeProvider, SlotSuggester, SummaryProvider};
use crate::voting::best_slot;

/// Wraps the optional AI and calendar capabilities behind draft-level
/// operations. None of them ever touch the store.
pub struct PollAssistant {
    suggester: Arc<dyn SlotSuggester>,
    summarizer: Arc<dyn SummaryProvider>,
    busy_time: Option<Arc<dyn BusyTimeProvider>>,
    slot_duration_minutes: u32,
}

impl PollAssistant {
    /// Assistant without calendar access and with the default slot length.
    pub fn new(suggester: Arc<dyn SlotSuggester>, summarizer: Arc<dyn SummaryProvider>) -> Self {
        Self {
            suggester,
            summarizer,
            busy_time: None,
            slot_duration_minutes: DEFAULT_SLOT_DURATION_MINUTES,
        }
    }

    /// Enable conflict checks against the creator's calendar.
    pub fn with_busy_time(mut self, provider: Arc<dyn BusyTimeProvider>) -> Self {
        self.busy_time = Some(provider);
        self
    }

    /// Slot length in minutes used when a prompt names none (at least 1).
    pub fn with_slot_duration(mut self, minutes: u32) -> Self {
        self.slot_duration_minutes = minutes.max(1);
        self
    }

    /// Ask the suggester for slots and append them to `draft`.
    ///
    /// A blank prompt is a no-op. Returns the number of slots added.
    #[instrument(skip(self, draft), fields(existing_slots = draft.slots.len()))]
    pub async fn suggest_into_draft(
        &self,
        draft: &mut PollDraft,
        prompt: &str,
        reference_date: NaiveDate,
    ) -> Result<usize> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(0);
        }

        let proposals = self
            .suggester
            .suggest_slots(prompt, reference_date, self.slot_duration_minutes)
            .await
            .map_err(into_upstream)?;

        let added = draft.extend_with_proposals(&proposals);
        debug!(proposed = proposals.len(), added, "suggested slots applied");
        Ok(added)
    }

    /// Recommendation text for the poll's current votes.
    ///
    /// Falls back to a sentence derived from the vote tally when the provider
    /// fails, so this never errors.
    #[instrument(skip(self, poll), fields(poll_id = %poll.id))]
    pub async fn summarize_poll(&self, poll: &Poll) -> String {
        if poll.participants.is_empty() {
            return "No votes yet.".to_string();
        }

        match self.summarizer.summarize(&poll.slots, &poll.participants).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => fallback_summary(poll),
            Err(e) => {
                warn!(error = %e, "summary provider failed, using tally");
                fallback_summary(poll)
            }
        }
    }

    /// Draft slots that overlap the creator's busy time. Empty when no
    /// calendar is connected.
    #[instrument(skip(self, draft))]
    pub async fn find_conflicts(&self, draft: &PollDraft) -> Result<Vec<SlotId>> {
        let Some(provider) = &self.busy_time else {
            return Ok(Vec::new());
        };
        let (Some(start), Some(end)) = (
            draft.slots.iter().map(|slot| slot.start_time.instant()).min(),
            draft.slots.iter().map(|slot| slot.end_time.instant()).max(),
        ) else {
            return Ok(Vec::new());
        };

        let busy = provider.busy_intervals(start, end).await.map_err(into_upstream)?;
        Ok(draft.conflicting_slots(&busy).into_iter().map(|slot| slot.id.clone()).collect())
    }
}

fn into_upstream(error: TimeAlignError) -> TimeAlignError {
    match error {
        TimeAlignError::Upstream(_) => error,
        other => TimeAlignError::Upstream(other.to_string()),
    }
}

fn fallback_summary(poll: &Poll) -> String {
    match best_slot(poll) {
        Some(best) => format!(
            "Best option so far: {} to {} UTC ({} yes, {} maybe, {} no).",
            best.start_time.format("%a %b %-d, %H:%M"),
            best.end_time.format("%H:%M"),
            best.yes,
            best.maybe,
            best.no
        ),
        None => "No time slots to compare.".to_string(),
    }
}
