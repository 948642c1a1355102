//! The transition engine: one pure reducer over the whole snapshot.
//!
//! [`Engine::apply`] takes the current [`LibrarySnapshot`] and one [`Action`]
//! and returns the next snapshot. It is total: it never panics and never
//! returns an error. Actions referencing entities that do not exist leave
//! the snapshot unchanged (logged at `warn` level); unaffordable or disabled
//! reward purchases are silent no-ops by contract.
//!
//! # Determinism
//!
//! Identical `(snapshot, action)` pairs always yield identical results, with
//! two documented impurities: the wall clock (consulted only when an action
//! omits a timestamp) and the id generator (consulted only when an action
//! creates an entity). Both are injected -- tests pass
//! [`FixedClock`](biblio_model::id::FixedClock) and
//! [`SequentialIds`](biblio_model::id::SequentialIds) for fully reproducible
//! runs.
//!
//! # Composition
//!
//! Every action case performs, in order:
//!
//! 1. structural update of the affected entities ([`books`](crate::books) or
//!    [`manga`](crate::manga) sub-reducer);
//! 2. history-log append describing the transition (inside the sub-reducer);
//! 3. derived-aggregate recomputation ([`sagas`](crate::sagas) /
//!    [`manga`](crate::manga) integrity passes);
//! 4. conditional reward crediting ([`rewards`](crate::rewards)) when the
//!    action is a completion event, with strict before/after comparison so a
//!    bonus is awarded exactly once per `false -> true` completion flip.
//!
//! # Example
//!
//! ```
//! use biblio_engine::prelude::*;
//!
//! let mut engine = Engine::new(SequentialIds::new(), FixedClock(0));
//! let empty = LibrarySnapshot::default();
//!
//! let snapshot = engine.apply(&empty, Action::AddBook(NewBook {
//!     title: "Dune".to_owned(),
//!     author: "Frank Herbert".to_owned(),
//!     pages: 412,
//!     ..NewBook::default()
//! }));
//!
//! assert_eq!(snapshot.books.len(), 1);
//! assert!(empty.books.is_empty()); // the input is never touched
//! ```

use biblio_model::book::ReadingState;
use biblio_model::id::{Clock, ClockIds, EntityId, IdGenerator, SystemClock};
use biblio_model::ledger::CurrencyMode;
use biblio_model::snapshot::LibrarySnapshot;

use crate::action::Action;
use crate::rewards::Currency;
use crate::{books, manga, rewards, sagas};

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The state-transition engine with its two injected collaborators.
#[derive(Debug, Clone)]
pub struct Engine<I: IdGenerator, C: Clock> {
    ids: I,
    clock: C,
}

/// Engine wired to the real clock and the timestamp-based id generator.
pub type SystemEngine = Engine<ClockIds<SystemClock>, SystemClock>;

impl SystemEngine {
    /// An engine using the system clock for both timestamps and ids.
    pub fn with_system_defaults() -> Self {
        Engine::new(ClockIds::new(SystemClock), SystemClock)
    }
}

impl<I: IdGenerator, C: Clock> Engine<I, C> {
    /// Create an engine with explicit collaborators.
    pub fn new(ids: I, clock: C) -> Self {
        Self { ids, clock }
    }

    /// Apply one action, returning the next snapshot.
    ///
    /// The input snapshot is never mutated; the result is a structurally new
    /// value, so callers can keep reading the previous snapshot while the
    /// new one is persisted.
    pub fn apply(&mut self, snapshot: &LibrarySnapshot, action: Action) -> LibrarySnapshot {
        let mut next = snapshot.clone();
        match action {
            // -- books --------------------------------------------------
            Action::AddBook(new) => {
                let now = self.clock.now();
                books::add_book(&mut next, new, &mut self.ids, now);
                settle_sagas(&mut next);
            }
            Action::ChangeBookState { id, state, note } => {
                let now = self.clock.now();
                if books::change_state(&mut next, id, state, note, now) {
                    settle_sagas(&mut next);
                } else {
                    warn_missing("book", id);
                }
            }
            Action::FinishReading {
                id,
                date,
                rating,
                review,
            } => {
                let finished = date.unwrap_or_else(|| self.clock.now());
                let saga_id = next.book(id).and_then(|b| b.saga_id);
                let was_complete = saga_is_complete(&next, saga_id);
                match books::finish_reading(&mut next, id, finished, rating, review) {
                    Some(pages) => {
                        settle_sagas(&mut next);
                        let newly_complete =
                            !was_complete && saga_is_complete(&next, saga_id);
                        rewards::on_book_finished(&mut next, pages, newly_complete);
                    }
                    None => warn_missing("book", id),
                }
            }
            Action::AbandonBook { id, note } => {
                let now = self.clock.now();
                if books::abandon(&mut next, id, note, now) {
                    settle_sagas(&mut next);
                } else {
                    warn_missing("book", id);
                }
            }
            Action::BuyBook { id, price, date } => {
                let date = date.unwrap_or_else(|| self.clock.now());
                if books::buy(&mut next, id, price, date) {
                    settle_sagas(&mut next);
                } else {
                    warn_missing("book", id);
                }
            }
            Action::LoanBook { id, to, date } => {
                let date = date.unwrap_or_else(|| self.clock.now());
                if !books::loan(&mut next, id, to, date) {
                    warn_missing("book", id);
                }
            }
            Action::ReturnBook { id } => {
                if !books::return_book(&mut next, id) {
                    warn_missing("book", id);
                }
            }
            Action::DeleteBook { id } => {
                if books::delete(&mut next, id) {
                    settle_sagas(&mut next);
                } else {
                    warn_missing("book", id);
                }
            }

            // -- manga --------------------------------------------------
            Action::AddCollection(new) => {
                let id = manga::add_collection(&mut next, new, &mut self.ids);
                if let Some(collection) = next.collection_mut(id) {
                    manga::recompute_collection(collection);
                }
            }
            Action::AddVolume {
                collection_id,
                volume,
            } => {
                let now = self.clock.now();
                let before = collection_is_complete(&next, collection_id);
                match manga::add_volume(&mut next, collection_id, volume, &mut self.ids, now) {
                    Some(_) => {
                        if settle_collection(&mut next, collection_id, before) {
                            rewards::on_collection_completed(&mut next);
                        }
                    }
                    None => warn_missing("collection", collection_id),
                }
            }
            Action::ChangeVolumeState {
                collection_id,
                volume_id,
                state,
                note,
            } => {
                let now = self.clock.now();
                let before = collection_is_complete(&next, collection_id);
                if manga::change_volume_state(&mut next, collection_id, volume_id, state, note, now)
                {
                    settle_collection(&mut next, collection_id, before);
                } else {
                    warn_missing("volume", volume_id);
                }
            }
            Action::BuyVolume {
                collection_id,
                volume_id,
                date,
            } => {
                let date = date.unwrap_or_else(|| self.clock.now());
                let before = collection_is_complete(&next, collection_id);
                if manga::buy_volume(&mut next, collection_id, volume_id, date) {
                    settle_collection(&mut next, collection_id, before);
                } else {
                    warn_missing("volume", volume_id);
                }
            }
            Action::ReadVolume {
                collection_id,
                volume_id,
                date,
                rating,
                review,
            } => {
                let date = date.unwrap_or_else(|| self.clock.now());
                let before = collection_is_complete(&next, collection_id);
                if manga::read_volume(&mut next, collection_id, volume_id, date, rating, review) {
                    let newly_complete = settle_collection(&mut next, collection_id, before);
                    rewards::on_volume_read(&mut next, newly_complete);
                } else {
                    warn_missing("volume", volume_id);
                }
            }
            Action::RemoveVolume {
                collection_id,
                volume_id,
            } => {
                let before = collection_is_complete(&next, collection_id);
                if manga::remove_volume(&mut next, collection_id, volume_id) {
                    settle_collection(&mut next, collection_id, before);
                } else {
                    warn_missing("volume", volume_id);
                }
            }
            Action::DeleteCollection { id } => {
                if !manga::delete_collection(&mut next, id) {
                    warn_missing("collection", id);
                }
            }

            // -- reward purchases ---------------------------------------
            Action::BuyBookWithPoints { id } => {
                let now = self.clock.now();
                reward_purchase(&mut next, id, CurrencyMode::Points, now);
            }
            Action::BuyBookWithMoney { id } => {
                let now = self.clock.now();
                reward_purchase(&mut next, id, CurrencyMode::Money, now);
            }

            // -- configuration & snapshot -------------------------------
            Action::UpdateConfig(config) => {
                next.config = config;
            }
            Action::SetCurrencyMode(mode) => {
                next.ledger.mode = mode;
            }
            Action::ImportSnapshot(partial) => {
                next.merge(partial);
                settle_sagas(&mut next);
                manga::recompute_all_collections(&mut next);
            }
            Action::RecordScan { code, date } => {
                let at = date.unwrap_or_else(|| self.clock.now());
                next.push_scan(code, at);
            }
            Action::RecordSearch { term } => {
                next.push_search(term);
            }
        }
        next
    }
}

// ---------------------------------------------------------------------------
// Shared settle/flip helpers
// ---------------------------------------------------------------------------

/// Re-derive saga aggregates and drop orphans. Runs after any action that
/// can change a book's saga membership or reading state.
fn settle_sagas(snapshot: &mut LibrarySnapshot) {
    sagas::recompute_sagas(snapshot);
    sagas::prune_orphan_sagas(snapshot);
}

/// Recompute one collection's aggregates; returns `true` when the action
/// flipped its completion flag from incomplete to complete.
fn settle_collection(
    snapshot: &mut LibrarySnapshot,
    collection_id: EntityId,
    was_complete: bool,
) -> bool {
    if let Some(collection) = snapshot.collection_mut(collection_id) {
        manga::recompute_collection(collection);
    }
    !was_complete && collection_is_complete(snapshot, collection_id)
}

fn saga_is_complete(snapshot: &LibrarySnapshot, saga_id: Option<EntityId>) -> bool {
    saga_id
        .and_then(|id| snapshot.saga(id))
        .is_some_and(|saga| saga.is_complete)
}

fn collection_is_complete(snapshot: &LibrarySnapshot, id: EntityId) -> bool {
    snapshot
        .collection(id)
        .is_some_and(|collection| collection.is_complete)
}

/// Spend the active currency to unlock a wishlist book.
///
/// No-op unless the reward system is enabled, `required` is the active mode,
/// the book exists on the wishlist, and the balance covers the cost. The
/// engine deliberately gives no error signal distinguishing "insufficient
/// funds" from "feature disabled".
fn reward_purchase(
    snapshot: &mut LibrarySnapshot,
    id: EntityId,
    required: CurrencyMode,
    now: biblio_model::id::Timestamp,
) {
    let Some(book) = snapshot.book(id) else {
        warn_missing("book", id);
        return;
    };
    if book.state != ReadingState::Wishlist {
        tracing::warn!(book = %id, state = ?book.state, "reward purchase needs a wishlist book");
        return;
    }
    let book = book.clone();

    let Some(mut currency) = Currency::active(snapshot) else {
        return;
    };
    if currency.mode() != required {
        return;
    }
    let cost = currency.purchase_cost(&book);
    if !currency.can_afford(cost) {
        return;
    }
    currency.debit(cost);
    currency.record_purchase();

    let note = match required {
        CurrencyMode::Points => "Comprado con puntos",
        CurrencyMode::Money => "Comprado con dinero virtual",
    };
    books::change_state(
        snapshot,
        id,
        ReadingState::ToRead,
        Some(note.to_owned()),
        now,
    );
    settle_sagas(snapshot);
}

fn warn_missing(kind: &'static str, id: EntityId) {
    tracing::warn!(kind, id = %id, "action references a missing entity; snapshot unchanged");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
