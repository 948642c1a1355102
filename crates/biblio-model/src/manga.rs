//! Manga collections and volumes.
//!
//! A [`MangaCollection`] groups numbered [`Volume`]s and carries derived
//! ownership/read counts, a completion flag, and the total value of the owned
//! volumes. The derived fields are recomputed by the engine's manga integrity
//! pass after every volume-level mutation.

use serde::{Deserialize, Serialize};

use crate::book::ReadingState;
use crate::history::StateLog;
use crate::id::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Volume
// ---------------------------------------------------------------------------

/// One numbered volume (tomo) of a manga collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Volume {
    /// Unique id.
    pub id: EntityId,
    /// Sequence number within the collection (1-based).
    #[serde(rename = "numero")]
    pub number: u32,
    /// Current state. Volumes use the same state set as books.
    #[serde(rename = "estado")]
    pub state: ReadingState,
    /// Append-only transition history.
    #[serde(rename = "historialEstados")]
    pub history: StateLog,
    /// Purchase date, if bought.
    #[serde(rename = "fechaCompra", skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<Timestamp>,
    /// Date the volume was finished, if read.
    #[serde(rename = "fechaLectura", skip_serializing_if = "Option::is_none")]
    pub read_date: Option<Timestamp>,
    /// Rating given when read (1-10).
    #[serde(rename = "calificacion", skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Free-form review text.
    #[serde(rename = "resena", skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
}

impl Default for Volume {
    fn default() -> Self {
        Self {
            id: EntityId(0),
            number: 0,
            state: ReadingState::Wishlist,
            history: StateLog::new(),
            purchase_date: None,
            read_date: None,
            rating: None,
            review: None,
        }
    }
}

impl Volume {
    /// Move the volume to `state` and append the matching history entry.
    pub fn enter_state(&mut self, state: ReadingState, at: Timestamp, note: Option<String>) {
        self.state = state;
        let note = note.or_else(|| Some(state.transition_label().to_owned()));
        self.history.push(state, at, note);
    }
}

// ---------------------------------------------------------------------------
// MangaCollection
// ---------------------------------------------------------------------------

/// A manga collection with a known total number of volumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MangaCollection {
    /// Unique id.
    pub id: EntityId,
    /// Series title.
    #[serde(rename = "titulo")]
    pub title: String,
    /// Total number of volumes the series has (the collection goal).
    #[serde(rename = "totalTomos")]
    pub total_volumes: u32,
    /// Price of a single volume, used to derive `total_value`.
    #[serde(rename = "precioPorTomo")]
    pub price_per_volume: f64,
    /// The tracked volumes.
    #[serde(rename = "tomos")]
    pub volumes: Vec<Volume>,
    /// Derived: volumes that count as owned (see the ownership predicate in
    /// the engine's manga integrity module).
    #[serde(rename = "tomosComprados")]
    pub owned_count: u32,
    /// Derived: volumes in the read state.
    #[serde(rename = "tomosLeidos")]
    pub read_count: u32,
    /// Derived: all volumes tracked (`volumes.len() == total_volumes`).
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
    /// Derived: `owned_count * price_per_volume`.
    #[serde(rename = "valorTotal")]
    pub total_value: f64,
}

impl Default for MangaCollection {
    fn default() -> Self {
        Self {
            id: EntityId(0),
            title: String::new(),
            total_volumes: 0,
            price_per_volume: 0.0,
            volumes: Vec::new(),
            owned_count: 0,
            read_count: 0,
            is_complete: false,
            total_value: 0.0,
        }
    }
}

impl MangaCollection {
    /// Look up a volume by id.
    pub fn volume(&self, id: EntityId) -> Option<&Volume> {
        self.volumes.iter().find(|v| v.id == id)
    }

    /// Mutable lookup of a volume by id.
    pub fn volume_mut(&mut self, id: EntityId) -> Option<&mut Volume> {
        self.volumes.iter_mut().find(|v| v.id == id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_enter_state_mirrors_book_behaviour() {
        let mut volume = Volume {
            id: EntityId(1),
            number: 1,
            ..Volume::default()
        };
        volume.enter_state(ReadingState::Purchased, 7, None);
        assert_eq!(volume.state, ReadingState::Purchased);
        assert_eq!(volume.history.last_state(), Some(ReadingState::Purchased));
    }

    #[test]
    fn collection_round_trips_with_legacy_field_names() {
        let collection = MangaCollection {
            id: EntityId(2),
            title: "Berserk".to_owned(),
            total_volumes: 42,
            price_per_volume: 8.95,
            ..MangaCollection::default()
        };
        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json["titulo"], "Berserk");
        assert_eq!(json["totalTomos"], 42);
        assert_eq!(json["tomosComprados"], 0);
        assert_eq!(json["valorTotal"], 0.0);

        let back: MangaCollection = serde_json::from_value(json).unwrap();
        assert_eq!(back, collection);
    }

    #[test]
    fn volume_lookup_by_id() {
        let mut collection = MangaCollection::default();
        collection.volumes.push(Volume {
            id: EntityId(5),
            number: 1,
            ..Volume::default()
        });
        assert!(collection.volume(EntityId(5)).is_some());
        assert!(collection.volume(EntityId(6)).is_none());
        collection.volume_mut(EntityId(5)).unwrap().number = 2;
        assert_eq!(collection.volume(EntityId(5)).unwrap().number, 2);
    }
}
