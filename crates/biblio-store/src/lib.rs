//! Biblio Store -- persistence for library snapshots.
//!
//! The store is a collaborator of the transition engine, not part of it:
//! the host loads a snapshot at startup, feeds it through the engine, and
//! saves the settled result after each transition. See [`store`] for the
//! file format and the integrity-hash envelope.

#![deny(unsafe_code)]

pub mod store;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use biblio_model;
pub use store::{JsonFileStore, MemoryStore, SnapshotStore, StoreError, ENVELOPE_VERSION};
