//! Biblio Engine -- the state-transition engine for the personal library
//! tracker.
//!
//! This crate builds on [`biblio_model`] to provide the reducer that drives
//! the application: a typed, closed [`Action`](action::Action) set and a
//! total [`Engine::apply`](engine::Engine::apply) that maps
//! `(snapshot, action)` to the next snapshot while maintaining the
//! cross-entity invariants -- saga membership and completion, manga volume
//! ownership counts, reward accounting, and the append-only history logs.
//!
//! The engine is single-threaded and synchronous; persistence and rendering
//! are collaborator concerns that happen after `apply` returns.
//!
//! # Quick Start
//!
//! ```
//! use biblio_engine::prelude::*;
//!
//! let mut engine = Engine::new(SequentialIds::new(), FixedClock(0));
//! let mut snapshot = LibrarySnapshot::default();
//!
//! snapshot = engine.apply(&snapshot, Action::AddBook(NewBook {
//!     title: "El imperio final".to_owned(),
//!     author: "Brandon Sanderson".to_owned(),
//!     pages: 541,
//!     saga: Some("Mistborn".to_owned()),
//!     ..NewBook::default()
//! }));
//!
//! let id = snapshot.books[0].id;
//! snapshot = engine.apply(&snapshot, Action::FinishReading {
//!     id,
//!     date: None,
//!     rating: Some(9),
//!     review: None,
//! });
//!
//! // 10 per book + 541 pages * 1 + 50 saga bonus (single-book saga complete).
//! assert_eq!(snapshot.ledger.points.current, 601.0);
//! ```

#![deny(unsafe_code)]

pub mod action;
pub mod books;
pub mod engine;
pub mod manga;
pub mod rewards;
pub mod sagas;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the model crate for convenience.
pub use biblio_model;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    // Re-export everything from the model prelude.
    pub use biblio_model::prelude::*;

    // Engine-specific exports.
    pub use crate::action::{Action, NewBook, NewCollection, NewVolume};
    pub use crate::engine::{Engine, SystemEngine};
    pub use crate::manga::{recompute_collection, volume_is_owned};
    pub use crate::sagas::{prune_orphan_sagas, recompute_sagas};
}
