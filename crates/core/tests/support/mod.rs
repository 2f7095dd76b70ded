//! Shared test helpers for `timealign-core` integration tests.
//!
//! The in-memory store behaves like a generation-checked object store: every
//! successful write bumps a global generation counter and conditional writes
//! compare against the object's current generation.

pub mod fixtures;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use timealign_core::{Generation, ObjectStore, StoredObject, WriteOutcome};
use timealign_domain::{Result as DomainResult, TimeAlignError};
use tokio::sync::Barrier;

#[derive(Default)]
struct Objects {
    entries: HashMap<String, (Vec<u8>, u64)>,
    last_generation: u64,
}

/// In-memory `ObjectStore` with call counters and fault injection.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<Objects>,
    always_conflict: AtomicBool,
    failure: Mutex<Option<TimeAlignError>>,
    read_barrier: Option<Arc<Barrier>>,
    barrier_slots: AtomicUsize,
    gets: AtomicUsize,
    conditional_puts: AtomicUsize,
    unconditional_puts: AtomicUsize,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first `parties` reads each take their snapshot and then wait until
    /// all of them have read, so they all hold the same generation.
    pub fn with_read_barrier(mut self, parties: usize) -> Self {
        self.read_barrier = Some(Arc::new(Barrier::new(parties)));
        self.barrier_slots = AtomicUsize::new(parties);
        self
    }

    /// Make every conditional put report a generation mismatch.
    pub fn always_conflict(self) -> Self {
        self.always_conflict.store(true, Ordering::SeqCst);
        self
    }

    /// Fail every subsequent call with `error`.
    pub fn fail_with(&self, error: TimeAlignError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// Raw bytes currently stored under `name`.
    pub fn body(&self, name: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().entries.get(name).map(|(body, _)| body.clone())
    }

    pub fn generation(&self, name: &str) -> Option<u64> {
        self.objects.lock().unwrap().entries.get(name).map(|(_, generation)| *generation)
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn conditional_put_count(&self) -> usize {
        self.conditional_puts.load(Ordering::SeqCst)
    }

    pub fn unconditional_put_count(&self) -> usize {
        self.unconditional_puts.load(Ordering::SeqCst)
    }

    fn injected_failure(&self) -> DomainResult<()> {
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Objects {
    fn commit(&mut self, name: &str, body: Vec<u8>) {
        self.last_generation += 1;
        self.entries.insert(name.to_string(), (body, self.last_generation));
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn conditional_get(&self, name: &str) -> DomainResult<Option<StoredObject>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.injected_failure()?;

        let snapshot = self.objects.lock().unwrap().entries.get(name).cloned();

        if let Some(barrier) = &self.read_barrier {
            let waits = self
                .barrier_slots
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if waits {
                barrier.wait().await;
            }
        }

        Ok(snapshot.map(|(body, generation)| StoredObject {
            body,
            generation: Generation::new(generation.to_string()),
        }))
    }

    async fn unconditional_put(&self, name: &str, body: Vec<u8>) -> DomainResult<()> {
        self.unconditional_puts.fetch_add(1, Ordering::SeqCst);
        self.injected_failure()?;
        self.objects.lock().unwrap().commit(name, body);
        Ok(())
    }

    async fn conditional_put(
        &self,
        name: &str,
        body: Vec<u8>,
        expected: &Generation,
    ) -> DomainResult<WriteOutcome> {
        self.conditional_puts.fetch_add(1, Ordering::SeqCst);
        self.injected_failure()?;

        if self.always_conflict.load(Ordering::SeqCst) {
            return Ok(WriteOutcome::Conflict);
        }

        let mut objects = self.objects.lock().unwrap();
        let current = objects.entries.get(name).map(|(_, generation)| generation.to_string());
        if current.as_deref() != Some(expected.as_str()) {
            return Ok(WriteOutcome::Conflict);
        }

        objects.commit(name, body);
        Ok(WriteOutcome::Committed)
    }
}
