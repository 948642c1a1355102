//! Book sagas (series).
//!
//! A [`Saga`] is a named grouping of books. Its `count` and `is_complete`
//! fields are derived from the member books' states and are recomputed by the
//! engine's saga integrity pass after every action that can affect them; the
//! stored values exist so exported snapshots remain self-describing.

use serde::{Deserialize, Serialize};

use crate::id::EntityId;

/// A named series of books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Saga {
    /// Unique id.
    pub id: EntityId,
    /// Display name. Books reference sagas by id but also carry the name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Ids of the member books.
    #[serde(rename = "libros")]
    pub book_ids: Vec<EntityId>,
    /// Derived: number of member books. A saga with `count == 0` is pruned.
    pub count: u32,
    /// Derived: `count > 0` and every member book has been read.
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
}

impl Default for Saga {
    fn default() -> Self {
        Self {
            id: EntityId(0),
            name: String::new(),
            book_ids: Vec::new(),
            count: 0,
            is_complete: false,
        }
    }
}

impl Saga {
    /// A fresh saga with no members yet.
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_saga_is_empty_and_incomplete() {
        let saga = Saga::new(EntityId(4), "Mistborn");
        assert_eq!(saga.name, "Mistborn");
        assert_eq!(saga.count, 0);
        assert!(!saga.is_complete);
        assert!(saga.book_ids.is_empty());
    }

    #[test]
    fn legacy_member_field_is_libros() {
        let saga: Saga =
            serde_json::from_str(r#"{"id": 1, "nombre": "Dune", "libros": [10, 11]}"#).unwrap();
        assert_eq!(saga.book_ids, vec![EntityId(10), EntityId(11)]);
        // Derived fields default until the integrity pass recomputes them.
        assert_eq!(saga.count, 0);
    }
}
