//! Generation-checked document storage
//!
//! Two layers of port: [`ObjectStore`] moves bytes under an object name and
//! reports generations, [`VersionedStore`] moves typed documents. The update
//! engine only sees the typed layer.

pub mod document_store;
pub mod ports;

pub use document_store::PollDocumentStore;
pub use ports::{Generation, ObjectStore, StoredObject, Versioned, VersionedStore, WriteOutcome};
