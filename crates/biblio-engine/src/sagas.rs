//! Saga integrity: derived aggregates and orphan pruning.
//!
//! Saga membership is owned by the books (`Book::saga_id`); the saga's
//! `book_ids`, `count`, and `is_complete` fields are derivations of the book
//! collection. Both passes here are idempotent full re-scans -- cheap at
//! single-user scale -- and must run after any action that can change a
//! book's saga membership or reading state.

use biblio_model::book::ReadingState;
use biblio_model::id::{EntityId, IdGenerator};
use biblio_model::saga::Saga;
use biblio_model::snapshot::LibrarySnapshot;

/// Recompute every saga's membership list, count, and completion flag.
///
/// A saga is complete iff it has at least one member and every member book
/// is in the read state.
pub fn recompute_sagas(snapshot: &mut LibrarySnapshot) {
    let books = &snapshot.books;
    for saga in &mut snapshot.sagas {
        let members: Vec<EntityId> = books
            .iter()
            .filter(|b| b.saga_id == Some(saga.id))
            .map(|b| b.id)
            .collect();
        saga.count = members.len() as u32;
        saga.is_complete = !members.is_empty()
            && books
                .iter()
                .filter(|b| b.saga_id == Some(saga.id))
                .all(|b| b.state == ReadingState::Read);
        saga.book_ids = members;
    }
}

/// Drop every saga with no member books left.
///
/// Idempotent; expects [`recompute_sagas`] to have run first so that the
/// counts reflect the current book collection.
pub fn prune_orphan_sagas(snapshot: &mut LibrarySnapshot) {
    snapshot.sagas.retain(|saga| saga.count > 0);
}

/// Find the saga named `name`, creating it with a fresh id if absent.
///
/// Used when an added or imported book names a saga the snapshot does not
/// know yet.
pub fn ensure_saga<I: IdGenerator>(
    snapshot: &mut LibrarySnapshot,
    name: &str,
    ids: &mut I,
) -> EntityId {
    if let Some(saga) = snapshot.saga_by_name(name) {
        return saga.id;
    }
    let id = ids.next_id();
    snapshot.sagas.push(Saga::new(id, name));
    id
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
