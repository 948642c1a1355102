//! The full application snapshot.
//!
//! [`LibrarySnapshot`] is the single immutable value the transition engine
//! operates on: every entity collection, the reward ledger, the reward
//! configuration, and the two capped activity histories. The engine clones
//! the current snapshot, mutates the clone, and returns it -- the previous
//! snapshot is never touched, so readers can keep borrowing it lock-free.
//!
//! [`PartialSnapshot`] is the import/restore shape: every field optional,
//! merged field-by-field (present fields overwrite, absent fields leave the
//! current value alone). Malformed imports are never rejected; missing
//! fields simply keep their defaults.

use serde::{Deserialize, Serialize};

use crate::book::Book;
use crate::config::RewardConfig;
use crate::id::{EntityId, Timestamp};
use crate::ledger::RewardLedger;
use crate::manga::MangaCollection;
use crate::saga::Saga;

/// Retention cap for the barcode scan history (oldest evicted first).
pub const SCAN_HISTORY_CAP: usize = 100;

/// Retention cap for the search-term history (oldest evicted first).
pub const SEARCH_HISTORY_CAP: usize = 20;

// ---------------------------------------------------------------------------
// ScanEntry
// ---------------------------------------------------------------------------

/// One remembered barcode scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanEntry {
    /// The scanned barcode (usually an ISBN).
    #[serde(rename = "codigo")]
    pub code: String,
    /// When it was scanned.
    #[serde(rename = "fecha")]
    pub at: Timestamp,
}

impl Default for ScanEntry {
    fn default() -> Self {
        Self {
            code: String::new(),
            at: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// LibrarySnapshot
// ---------------------------------------------------------------------------

/// Complete application state, JSON-serializable in the legacy export shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySnapshot {
    /// All tracked books.
    #[serde(rename = "libros")]
    pub books: Vec<Book>,
    /// All sagas. Zero-member sagas never survive a settled action.
    pub sagas: Vec<Saga>,
    /// All manga collections.
    #[serde(rename = "colecciones")]
    pub collections: Vec<MangaCollection>,
    /// The reward account.
    #[serde(rename = "recompensas")]
    pub ledger: RewardLedger,
    /// Reward tunables.
    pub config: RewardConfig,
    /// Recent barcode scans, capped at [`SCAN_HISTORY_CAP`].
    #[serde(rename = "historialEscaneos")]
    pub scan_history: Vec<ScanEntry>,
    /// Recent search terms, capped at [`SEARCH_HISTORY_CAP`].
    #[serde(rename = "historialBusquedas")]
    pub search_history: Vec<String>,
}

impl LibrarySnapshot {
    /// Look up a book by id.
    pub fn book(&self, id: EntityId) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Mutable lookup of a book by id.
    pub fn book_mut(&mut self, id: EntityId) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| b.id == id)
    }

    /// Look up a saga by id.
    pub fn saga(&self, id: EntityId) -> Option<&Saga> {
        self.sagas.iter().find(|s| s.id == id)
    }

    /// Mutable lookup of a saga by id.
    pub fn saga_mut(&mut self, id: EntityId) -> Option<&mut Saga> {
        self.sagas.iter_mut().find(|s| s.id == id)
    }

    /// Look up a saga by display name.
    pub fn saga_by_name(&self, name: &str) -> Option<&Saga> {
        self.sagas.iter().find(|s| s.name == name)
    }

    /// Look up a collection by id.
    pub fn collection(&self, id: EntityId) -> Option<&MangaCollection> {
        self.collections.iter().find(|c| c.id == id)
    }

    /// Mutable lookup of a collection by id.
    pub fn collection_mut(&mut self, id: EntityId) -> Option<&mut MangaCollection> {
        self.collections.iter_mut().find(|c| c.id == id)
    }

    /// Remember a barcode scan, evicting the oldest entry past the cap.
    pub fn push_scan(&mut self, code: impl Into<String>, at: Timestamp) {
        self.scan_history.push(ScanEntry {
            code: code.into(),
            at,
        });
        while self.scan_history.len() > SCAN_HISTORY_CAP {
            self.scan_history.remove(0);
        }
    }

    /// Remember a search term, evicting the oldest entry past the cap.
    pub fn push_search(&mut self, term: impl Into<String>) {
        self.search_history.push(term.into());
        while self.search_history.len() > SEARCH_HISTORY_CAP {
            self.search_history.remove(0);
        }
    }

    /// Merge a partial snapshot into this one, field by field.
    ///
    /// Only fields present in `partial` overwrite; everything else keeps its
    /// current value. Derived aggregates are NOT recomputed here -- the
    /// engine's import path runs the integrity modules right after merging.
    pub fn merge(&mut self, partial: PartialSnapshot) {
        if let Some(books) = partial.books {
            self.books = books;
        }
        if let Some(sagas) = partial.sagas {
            self.sagas = sagas;
        }
        if let Some(collections) = partial.collections {
            self.collections = collections;
        }
        if let Some(ledger) = partial.ledger {
            self.ledger = ledger;
        }
        if let Some(config) = partial.config {
            self.config = config;
        }
        if let Some(scan_history) = partial.scan_history {
            self.scan_history = scan_history;
            while self.scan_history.len() > SCAN_HISTORY_CAP {
                self.scan_history.remove(0);
            }
        }
        if let Some(search_history) = partial.search_history {
            self.search_history = search_history;
            while self.search_history.len() > SEARCH_HISTORY_CAP {
                self.search_history.remove(0);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PartialSnapshot
// ---------------------------------------------------------------------------

/// A snapshot with every field optional, used for import/restore.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialSnapshot {
    /// Replacement book collection, if present.
    #[serde(rename = "libros", skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<Book>>,
    /// Replacement saga collection, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sagas: Option<Vec<Saga>>,
    /// Replacement manga collections, if present.
    #[serde(rename = "colecciones", skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<MangaCollection>>,
    /// Replacement ledger, if present.
    #[serde(rename = "recompensas", skip_serializing_if = "Option::is_none")]
    pub ledger: Option<RewardLedger>,
    /// Replacement configuration, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<RewardConfig>,
    /// Replacement scan history, if present.
    #[serde(rename = "historialEscaneos", skip_serializing_if = "Option::is_none")]
    pub scan_history: Option<Vec<ScanEntry>>,
    /// Replacement search history, if present.
    #[serde(rename = "historialBusquedas", skip_serializing_if = "Option::is_none")]
    pub search_history: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
