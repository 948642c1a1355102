//! Books and reading states.
//!
//! A [`Book`] carries its bibliographic data, the current [`ReadingState`],
//! the append-only state history, optional saga membership, loan and purchase
//! metadata, and the list of completed [`ReadingSession`]s.
//!
//! JSON field names follow the legacy export schema (`titulo`, `estado`,
//! `historialEstados`, ...) so snapshots written by the original application
//! keep loading.

use serde::{Deserialize, Serialize};

use crate::history::StateLog;
use crate::id::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// ReadingState
// ---------------------------------------------------------------------------

/// The reading state of a book or manga volume.
///
/// Serialized as the legacy Spanish tokens. Note that [`ReadingState::Loaned`]
/// exists as a first-class state in the legacy schema even though the engine
/// tracks active loans through the separate `prestado` flag on [`Book`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadingState {
    /// Wanted but not owned yet.
    #[serde(rename = "wishlist")]
    Wishlist,
    /// Owned (or queued) and waiting to be read.
    #[serde(rename = "tbr")]
    ToRead,
    /// Currently being read.
    #[serde(rename = "leyendo")]
    Reading,
    /// Finished.
    #[serde(rename = "leido")]
    Read,
    /// Started but given up on.
    #[serde(rename = "abandonado")]
    Abandoned,
    /// Purchased.
    #[serde(rename = "comprado")]
    Purchased,
    /// Lent out.
    #[serde(rename = "prestado")]
    Loaned,
}

impl ReadingState {
    /// Human-readable annotation the history log uses when an entity enters
    /// this state. These are the exact strings the legacy UI displays.
    pub fn transition_label(self) -> &'static str {
        match self {
            ReadingState::Wishlist => "Añadido a la wishlist",
            ReadingState::ToRead => "Añadido a la pila de pendientes",
            ReadingState::Reading => "Empezado a leer",
            ReadingState::Read => "Terminado de leer",
            ReadingState::Abandoned => "Lectura abandonada",
            ReadingState::Purchased => "Comprado",
            ReadingState::Loaned => "Prestado",
        }
    }
}

// ---------------------------------------------------------------------------
// ReadingSession
// ---------------------------------------------------------------------------

/// One completed (or abandoned) read-through of a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingSession {
    /// When the session started, if recorded.
    #[serde(rename = "inicio", skip_serializing_if = "Option::is_none")]
    pub started: Option<Timestamp>,
    /// When the session ended.
    #[serde(rename = "fin")]
    pub finished: Timestamp,
    /// Rating given at the end of this session (1-10).
    #[serde(rename = "calificacion", skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Free-form review text.
    #[serde(rename = "resena", skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    /// Pages read during this session, when it differs from the book length.
    #[serde(rename = "paginasLeidas", skip_serializing_if = "Option::is_none")]
    pub pages_read: Option<u32>,
}

impl Default for ReadingSession {
    fn default() -> Self {
        Self {
            started: None,
            finished: 0,
            rating: None,
            review: None,
            pages_read: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Book
// ---------------------------------------------------------------------------

/// A tracked book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    /// Unique id, assigned by the injected id generator.
    pub id: EntityId,
    /// Title.
    #[serde(rename = "titulo")]
    pub title: String,
    /// Author.
    #[serde(rename = "autor")]
    pub author: String,
    /// Page count. Drives the per-page reward and money-mode pricing.
    #[serde(rename = "paginas")]
    pub pages: u32,
    /// Current reading state. Invariant: equals the last history entry.
    #[serde(rename = "estado")]
    pub state: ReadingState,
    /// Append-only transition history.
    #[serde(rename = "historialEstados")]
    pub history: StateLog,
    /// Id of the saga this book belongs to, if any.
    #[serde(rename = "sagaId", skip_serializing_if = "Option::is_none")]
    pub saga_id: Option<EntityId>,
    /// Name of that saga, duplicated here for display without a lookup.
    #[serde(rename = "sagaName", skip_serializing_if = "Option::is_none")]
    pub saga_name: Option<String>,
    /// Whether the book is currently lent out. Loan status is side
    /// information; it does not replace the reading state.
    #[serde(rename = "prestado")]
    pub loaned: bool,
    /// Who the book is lent to.
    #[serde(rename = "prestadoA", skip_serializing_if = "Option::is_none")]
    pub loaned_to: Option<String>,
    /// When the loan started.
    #[serde(rename = "fechaPrestamo", skip_serializing_if = "Option::is_none")]
    pub loan_date: Option<Timestamp>,
    /// Purchase price, if bought.
    #[serde(rename = "precio", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Purchase date, if bought.
    #[serde(rename = "fechaCompra", skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<Timestamp>,
    /// Latest rating given in any reading session (1-10).
    #[serde(rename = "calificacion", skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Completed reading sessions, oldest first.
    #[serde(rename = "lecturas")]
    pub sessions: Vec<ReadingSession>,
}

impl Default for Book {
    fn default() -> Self {
        Self {
            id: EntityId(0),
            title: String::new(),
            author: String::new(),
            pages: 0,
            state: ReadingState::Wishlist,
            history: StateLog::new(),
            saga_id: None,
            saga_name: None,
            loaned: false,
            loaned_to: None,
            loan_date: None,
            price: None,
            purchase_date: None,
            rating: None,
            sessions: Vec::new(),
        }
    }
}

impl Book {
    /// Move the book to `state` and append the matching history entry.
    ///
    /// `note` overrides the default state label when present.
    pub fn enter_state(&mut self, state: ReadingState, at: Timestamp, note: Option<String>) {
        self.state = state;
        let note = note.or_else(|| Some(state.transition_label().to_owned()));
        self.history.push(state, at, note);
    }

    /// Pages credited for a finished session: the session's own page count
    /// when recorded, the book length otherwise.
    pub fn pages_for_session(&self, session: &ReadingSession) -> u32 {
        session.pages_read.unwrap_or(self.pages)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
