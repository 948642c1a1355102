//! Manga integrity: the ownership predicate and derived collection
//! aggregates.
//!
//! The ownership predicate is inherited behavior, preserved exactly: a
//! volume counts as owned when it has a purchase date OR its state is one of
//! purchased/read/reading. That is deliberately broader than "has been
//! purchased" (a volume being read without a recorded purchase still counts).
//! The rule lives in one named function, [`volume_is_owned`], so the
//! ambiguity is documented and tested in exactly one place.

use biblio_model::book::ReadingState;
use biblio_model::history::StateLog;
use biblio_model::id::{EntityId, IdGenerator, Timestamp};
use biblio_model::manga::{MangaCollection, Volume};
use biblio_model::snapshot::LibrarySnapshot;

use crate::action::{NewCollection, NewVolume};

/// Whether a volume counts as acquired.
///
/// True when the volume has a purchase date, or when its state implies
/// possession (`Purchased`, `Read`, or `Reading`). A wishlisted volume with
/// no purchase date does not count.
pub fn volume_is_owned(volume: &Volume) -> bool {
    volume.purchase_date.is_some()
        || matches!(
            volume.state,
            ReadingState::Purchased | ReadingState::Read | ReadingState::Reading
        )
}

/// Recompute a collection's derived aggregates.
///
/// - `owned_count`: volumes satisfying [`volume_is_owned`];
/// - `read_count`: volumes in the read state;
/// - `is_complete`: every volume of the series is tracked
///   (`volumes.len() == total_volumes`);
/// - `total_value`: owned volumes times the per-volume price.
pub fn recompute_collection(collection: &mut MangaCollection) {
    collection.owned_count = collection
        .volumes
        .iter()
        .filter(|v| volume_is_owned(v))
        .count() as u32;
    collection.read_count = collection
        .volumes
        .iter()
        .filter(|v| v.state == ReadingState::Read)
        .count() as u32;
    // Plain equality, inherited as-is: a zero-total collection with no
    // tracked volumes reports complete (0 == 0).
    collection.is_complete = collection.volumes.len() as u32 == collection.total_volumes;
    collection.total_value = f64::from(collection.owned_count) * collection.price_per_volume;
}

/// Recompute every collection in the snapshot. Used by the import path.
pub fn recompute_all_collections(snapshot: &mut LibrarySnapshot) {
    for collection in &mut snapshot.collections {
        recompute_collection(collection);
    }
}

// ---------------------------------------------------------------------------
// Structural operations
// ---------------------------------------------------------------------------

/// Insert a new manga collection with a fresh id.
pub fn add_collection<I: IdGenerator>(
    snapshot: &mut LibrarySnapshot,
    new: NewCollection,
    ids: &mut I,
) -> EntityId {
    let id = ids.next_id();
    snapshot.collections.push(MangaCollection {
        id,
        title: new.title,
        total_volumes: new.total_volumes,
        price_per_volume: new.price_per_volume,
        ..MangaCollection::default()
    });
    id
}

/// Add a volume to a collection, seeding its history with the initial state.
///
/// Returns the new volume's id, or `None` when the collection does not
/// exist.
pub fn add_volume<I: IdGenerator>(
    snapshot: &mut LibrarySnapshot,
    collection_id: EntityId,
    new: NewVolume,
    ids: &mut I,
    now: Timestamp,
) -> Option<EntityId> {
    // Reserve the id only once the collection is known to exist.
    snapshot.collection(collection_id)?;
    let id = ids.next_id();
    let state = new.state.unwrap_or(ReadingState::Wishlist);
    let collection = snapshot.collection_mut(collection_id)?;
    collection.volumes.push(Volume {
        id,
        number: new.number,
        state,
        history: StateLog::seeded(state, now, Some(state.transition_label().to_owned())),
        ..Volume::default()
    });
    Some(id)
}

/// Move a volume to a new state, appending the annotated history entry.
pub fn change_volume_state(
    snapshot: &mut LibrarySnapshot,
    collection_id: EntityId,
    volume_id: EntityId,
    state: ReadingState,
    note: Option<String>,
    now: Timestamp,
) -> bool {
    let Some(volume) = snapshot
        .collection_mut(collection_id)
        .and_then(|c| c.volume_mut(volume_id))
    else {
        return false;
    };
    volume.enter_state(state, now, note);
    true
}

/// Mark a volume as purchased: purchase date plus the purchased state.
pub fn buy_volume(
    snapshot: &mut LibrarySnapshot,
    collection_id: EntityId,
    volume_id: EntityId,
    date: Timestamp,
) -> bool {
    let Some(volume) = snapshot
        .collection_mut(collection_id)
        .and_then(|c| c.volume_mut(volume_id))
    else {
        return false;
    };
    volume.purchase_date = Some(date);
    volume.enter_state(ReadingState::Purchased, date, None);
    true
}

/// Mark a volume as read: read date, rating, review, and the read state.
pub fn read_volume(
    snapshot: &mut LibrarySnapshot,
    collection_id: EntityId,
    volume_id: EntityId,
    date: Timestamp,
    rating: Option<u8>,
    review: Option<String>,
) -> bool {
    let Some(volume) = snapshot
        .collection_mut(collection_id)
        .and_then(|c| c.volume_mut(volume_id))
    else {
        return false;
    };
    volume.read_date = Some(date);
    if rating.is_some() {
        volume.rating = rating;
    }
    if review.is_some() {
        volume.review = review;
    }
    volume.enter_state(ReadingState::Read, date, None);
    true
}

/// Remove a volume from its collection.
pub fn remove_volume(
    snapshot: &mut LibrarySnapshot,
    collection_id: EntityId,
    volume_id: EntityId,
) -> bool {
    let Some(collection) = snapshot.collection_mut(collection_id) else {
        return false;
    };
    let before = collection.volumes.len();
    collection.volumes.retain(|v| v.id != volume_id);
    collection.volumes.len() != before
}

/// Remove a collection and all its volumes.
pub fn delete_collection(snapshot: &mut LibrarySnapshot, id: EntityId) -> bool {
    let before = snapshot.collections.len();
    snapshot.collections.retain(|c| c.id != id);
    snapshot.collections.len() != before
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
