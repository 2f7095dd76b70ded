//! Port interfaces for generation-checked storage
//!
//! These traits define the boundaries between the update engine and the
//! object store implementations.

use std::fmt;

use async_trait::async_trait;
use timealign_domain::Result;

/// Opaque version token. Changes every time an object is successfully
/// written; only compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Generation(String);

impl Generation {
    /// Wrap a store-issued generation token.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Token as sent back in write preconditions.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw object body together with the generation it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Raw document bytes.
    pub body: Vec<u8>,
    /// Generation the body was read at.
    pub generation: Generation,
}

/// Outcome of a conditional write. A lost generation race is a value, not
/// an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The write replaced the expected generation.
    Committed,
    /// The stored generation no longer matched.
    Conflict,
}

/// Typed document paired with the generation it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    /// Decoded document.
    pub value: T,
    /// Generation the document was read at.
    pub generation: Generation,
}

/// Byte-level object store with generation preconditions
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read an object and its current generation. `Ok(None)` when the object
    /// does not exist.
    async fn conditional_get(&self, object_name: &str) -> Result<Option<StoredObject>>;

    /// Create or overwrite an object regardless of its generation.
    async fn unconditional_put(&self, object_name: &str, body: Vec<u8>) -> Result<()>;

    /// Write only if the stored generation still equals `expected`.
    async fn conditional_put(
        &self,
        object_name: &str,
        body: Vec<u8>,
        expected: &Generation,
    ) -> Result<WriteOutcome>;
}

/// Compare-and-swap over whole typed documents
#[async_trait]
pub trait VersionedStore<T>: Send + Sync
where
    T: Send + Sync,
{
    /// Read the document with `id`, or `Ok(None)` if it does not exist.
    async fn read(&self, id: &str) -> Result<Option<Versioned<T>>>;

    /// Replace the document only if it is still at `expected`.
    async fn write_if_version(
        &self,
        id: &str,
        value: &T,
        expected: &Generation,
    ) -> Result<WriteOutcome>;

    /// Replace the document unconditionally.
    async fn overwrite(&self, id: &str, value: &T) -> Result<()>;
}
