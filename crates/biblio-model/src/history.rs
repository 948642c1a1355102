//! Per-entity state history.
//!
//! Books and manga volumes keep an append-only [`StateLog`] recording every
//! reading-state transition with a timestamp and an optional human-readable
//! note. The log is never rewritten: the engine only appends, and the last
//! entry always names the entity's current state.

use serde::{Deserialize, Serialize};

use crate::book::ReadingState;
use crate::id::Timestamp;

// ---------------------------------------------------------------------------
// StateChange
// ---------------------------------------------------------------------------

/// One recorded state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChange {
    /// The state the entity entered.
    #[serde(rename = "estado")]
    pub state: ReadingState,
    /// When the transition happened (epoch milliseconds).
    #[serde(rename = "fecha")]
    pub at: Timestamp,
    /// Optional annotation shown in the UI history view.
    #[serde(rename = "nota", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// StateLog
// ---------------------------------------------------------------------------

/// Append-only sequence of [`StateChange`] entries.
///
/// Serialized as a bare JSON array to match the legacy `historialEstados`
/// field shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateLog(Vec<StateChange>);

impl StateLog {
    /// An empty log.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// A log seeded with a single initial entry.
    pub fn seeded(state: ReadingState, at: Timestamp, note: Option<String>) -> Self {
        let mut log = Self::new();
        log.push(state, at, note);
        log
    }

    /// Append a transition. Entries are never removed or reordered.
    pub fn push(&mut self, state: ReadingState, at: Timestamp, note: Option<String>) {
        self.0.push(StateChange { state, at, note });
    }

    /// The state recorded by the most recent entry, if any.
    pub fn last_state(&self) -> Option<ReadingState> {
        self.0.last().map(|change| change.state)
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[StateChange] {
        &self.0
    }

    /// Number of recorded transitions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
