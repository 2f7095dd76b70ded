//! Poll documents on top of a byte-level object store

use std::sync::Arc;

use async_trait::async_trait;
use timealign_domain::{Poll, PollId, Result, TimeAlignError};
use tracing::debug;

use super::ports::{Generation, ObjectStore, Versioned, VersionedStore, WriteOutcome};
use crate::codec;

/// Adapts an [`ObjectStore`] to `VersionedStore<Poll>`, storing each poll as
/// `<poll id>.json`.
pub struct PollDocumentStore<S: ?Sized> {
    objects: Arc<S>,
}

impl<S: ObjectStore + ?Sized> PollDocumentStore<S> {
    /// Store polls as objects in `objects`.
    pub fn new(objects: Arc<S>) -> Self {
        Self { objects }
    }
}

#[async_trait]
impl<S: ObjectStore + ?Sized> VersionedStore<Poll> for PollDocumentStore<S> {
    async fn read(&self, id: &str) -> Result<Option<Versioned<Poll>>> {
        let name = codec::object_name(&PollId::new(id));
        let Some(stored) = self.objects.conditional_get(&name).await? else {
            debug!(object = %name, "poll document not found");
            return Ok(None);
        };

        // A body that is not a poll is a bad store response, not a caller error
        let poll = codec::decode(&stored.body).map_err(|e| {
            TimeAlignError::Store(format!("object {} is not a valid poll document: {}", name, e))
        })?;

        debug!(object = %name, generation = %stored.generation, "poll document read");
        Ok(Some(Versioned { value: poll, generation: stored.generation }))
    }

    async fn write_if_version(
        &self,
        id: &str,
        value: &Poll,
        expected: &Generation,
    ) -> Result<WriteOutcome> {
        let name = codec::object_name(&PollId::new(id));
        let body = codec::encode(value)?;
        self.objects.conditional_put(&name, body, expected).await
    }

    async fn overwrite(&self, id: &str, value: &Poll) -> Result<()> {
        let name = codec::object_name(&PollId::new(id));
        let body = codec::encode(value)?;
        self.objects.unconditional_put(&name, body).await
    }
}
