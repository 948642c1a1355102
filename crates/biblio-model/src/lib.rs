//! Biblio Model -- data model for the personal library tracker.
//!
//! This crate defines the entity store the transition engine operates on:
//! books, sagas, manga collections and their volumes, the append-only state
//! history, the dual-mode reward ledger, the reward configuration, and the
//! full [`LibrarySnapshot`](snapshot::LibrarySnapshot). It also provides the
//! two injectable collaborators the engine depends on: the id generator and
//! the clock.
//!
//! All snapshot types serialize with `serde` using the legacy export field
//! names (`libros`, `historialEstados`, `tomosComprados`, ...), so snapshots
//! written by the original application keep loading unchanged.
//!
//! # Quick Start
//!
//! ```
//! use biblio_model::prelude::*;
//!
//! let mut snapshot = LibrarySnapshot::default();
//! snapshot.books.push(Book {
//!     id: EntityId(1),
//!     title: "Dune".to_owned(),
//!     ..Book::default()
//! });
//!
//! assert_eq!(snapshot.book(EntityId(1)).unwrap().title, "Dune");
//! ```

#![deny(unsafe_code)]

pub mod book;
pub mod config;
pub mod history;
pub mod id;
pub mod ledger;
pub mod manga;
pub mod saga;
pub mod snapshot;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::book::{Book, ReadingSession, ReadingState};
    pub use crate::config::RewardConfig;
    pub use crate::history::{StateChange, StateLog};
    pub use crate::id::{
        Clock, ClockIds, EntityId, FixedClock, IdGenerator, SequentialIds, SystemClock, Timestamp,
    };
    pub use crate::ledger::{CurrencyMode, ModeBalance, RewardLedger};
    pub use crate::manga::{MangaCollection, Volume};
    pub use crate::saga::Saga;
    pub use crate::snapshot::{
        LibrarySnapshot, PartialSnapshot, ScanEntry, SCAN_HISTORY_CAP, SEARCH_HISTORY_CAP,
    };
}
