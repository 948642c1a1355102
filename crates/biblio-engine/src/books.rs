//! Book sub-reducer: structural updates and history appends for every
//! book-level action.
//!
//! Functions here mutate the working snapshot and report whether the target
//! book existed; derived aggregates and reward crediting are composed on top
//! by the engine. A missing id is never an error -- the caller treats `false`
//! / `None` as "leave the snapshot as it was".

use biblio_model::book::{Book, ReadingSession, ReadingState};
use biblio_model::history::StateLog;
use biblio_model::id::{EntityId, IdGenerator, Timestamp};
use biblio_model::snapshot::LibrarySnapshot;

use crate::action::NewBook;
use crate::sagas;

/// Insert a new book with a fresh id, seeding its history with the initial
/// state. When the book names a saga the snapshot does not know yet, the
/// saga is created on the fly and linked.
pub fn add_book<I: IdGenerator>(
    snapshot: &mut LibrarySnapshot,
    new: NewBook,
    ids: &mut I,
    now: Timestamp,
) -> EntityId {
    let id = ids.next_id();
    let state = new.state.unwrap_or(ReadingState::Wishlist);
    let saga_id = new
        .saga
        .as_deref()
        .map(|name| sagas::ensure_saga(snapshot, name, ids));

    snapshot.books.push(Book {
        id,
        title: new.title,
        author: new.author,
        pages: new.pages,
        state,
        history: StateLog::seeded(state, now, Some(state.transition_label().to_owned())),
        saga_id,
        saga_name: new.saga,
        ..Book::default()
    });
    id
}

/// Move a book to `state`, appending the annotated history entry.
pub fn change_state(
    snapshot: &mut LibrarySnapshot,
    id: EntityId,
    state: ReadingState,
    note: Option<String>,
    now: Timestamp,
) -> bool {
    match snapshot.book_mut(id) {
        Some(book) => {
            book.enter_state(state, now, note);
            true
        }
        None => false,
    }
}

/// Record a completed read-through.
///
/// Appends a reading session, updates the book's rating to the latest one
/// given, and moves the book to the read state. Returns the pages credited
/// for the session, or `None` when the book does not exist.
pub fn finish_reading(
    snapshot: &mut LibrarySnapshot,
    id: EntityId,
    finished: Timestamp,
    rating: Option<u8>,
    review: Option<String>,
) -> Option<u32> {
    let book = snapshot.book_mut(id)?;
    let session = ReadingSession {
        started: None,
        finished,
        rating,
        review,
        pages_read: None,
    };
    let pages = book.pages_for_session(&session);
    book.sessions.push(session);
    if rating.is_some() {
        book.rating = rating;
    }
    book.enter_state(ReadingState::Read, finished, None);
    Some(pages)
}

/// Give up on a book.
pub fn abandon(
    snapshot: &mut LibrarySnapshot,
    id: EntityId,
    note: Option<String>,
    now: Timestamp,
) -> bool {
    change_state(snapshot, id, ReadingState::Abandoned, note, now)
}

/// Record an ordinary purchase: price, purchase date, and the purchased
/// state.
pub fn buy(
    snapshot: &mut LibrarySnapshot,
    id: EntityId,
    price: Option<f64>,
    date: Timestamp,
) -> bool {
    match snapshot.book_mut(id) {
        Some(book) => {
            book.price = price.or(book.price);
            book.purchase_date = Some(date);
            book.enter_state(ReadingState::Purchased, date, None);
            true
        }
        None => false,
    }
}

/// Lend a book out. Only the loan flag and metadata move; loan status is
/// side information and the state history is left untouched.
pub fn loan(snapshot: &mut LibrarySnapshot, id: EntityId, to: String, date: Timestamp) -> bool {
    match snapshot.book_mut(id) {
        Some(book) => {
            book.loaned = true;
            book.loaned_to = Some(to);
            book.loan_date = Some(date);
            true
        }
        None => false,
    }
}

/// Take a lent book back, clearing the loan metadata.
pub fn return_book(snapshot: &mut LibrarySnapshot, id: EntityId) -> bool {
    match snapshot.book_mut(id) {
        Some(book) => {
            book.loaned = false;
            book.loaned_to = None;
            book.loan_date = None;
            true
        }
        None => false,
    }
}

/// Remove a book entirely.
pub fn delete(snapshot: &mut LibrarySnapshot, id: EntityId) -> bool {
    let before = snapshot.books.len();
    snapshot.books.retain(|b| b.id != id);
    snapshot.books.len() != before
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use biblio_model::id::SequentialIds;

    fn add(snapshot: &mut LibrarySnapshot, ids: &mut SequentialIds, new: NewBook) -> EntityId {
        add_book(snapshot, new, ids, 1_000)
    }

    #[test]
    fn add_book_seeds_history_with_initial_state() {
        let mut snapshot = LibrarySnapshot::default();
        let mut ids = SequentialIds::new();
        let id = add(
            &mut snapshot,
            &mut ids,
            NewBook {
                title: "Dune".to_owned(),
                state: Some(ReadingState::ToRead),
                ..NewBook::default()
            },
        );
        let book = snapshot.book(id).unwrap();
        assert_eq!(book.state, ReadingState::ToRead);
        assert_eq!(book.history.len(), 1);
        assert_eq!(book.history.last_state(), Some(ReadingState::ToRead));
    }

    #[test]
    fn add_book_creates_and_links_missing_saga() {
        let mut snapshot = LibrarySnapshot::default();
        let mut ids = SequentialIds::new();
        let id = add(
            &mut snapshot,
            &mut ids,
            NewBook {
                title: "El imperio final".to_owned(),
                saga: Some("Mistborn".to_owned()),
                ..NewBook::default()
            },
        );
        let book = snapshot.book(id).unwrap();
        let saga = snapshot.saga_by_name("Mistborn").expect("saga created");
        assert_eq!(book.saga_id, Some(saga.id));
        assert_eq!(book.saga_name.as_deref(), Some("Mistborn"));
    }

    #[test]
    fn add_book_reuses_existing_saga() {
        let mut snapshot = LibrarySnapshot::default();
        let mut ids = SequentialIds::new();
        let first = add(
            &mut snapshot,
            &mut ids,
            NewBook {
                saga: Some("Mistborn".to_owned()),
                ..NewBook::default()
            },
        );
        let second = add(
            &mut snapshot,
            &mut ids,
            NewBook {
                saga: Some("Mistborn".to_owned()),
                ..NewBook::default()
            },
        );
        assert_eq!(snapshot.sagas.len(), 1);
        assert_eq!(
            snapshot.book(first).unwrap().saga_id,
            snapshot.book(second).unwrap().saga_id
        );
    }

    #[test]
    fn finish_reading_records_session_and_rating() {
        let mut snapshot = LibrarySnapshot::default();
        let mut ids = SequentialIds::new();
        let id = add(
            &mut snapshot,
            &mut ids,
            NewBook {
                pages: 320,
                ..NewBook::default()
            },
        );

        let pages = finish_reading(&mut snapshot, id, 2_000, Some(8), Some("Genial".to_owned()));
        assert_eq!(pages, Some(320));

        let book = snapshot.book(id).unwrap();
        assert_eq!(book.state, ReadingState::Read);
        assert_eq!(book.rating, Some(8));
        assert_eq!(book.sessions.len(), 1);
        assert_eq!(book.sessions[0].review.as_deref(), Some("Genial"));
        let last = book.history.entries().last().unwrap();
        assert_eq!(last.note.as_deref(), Some("Terminado de leer"));
    }

    #[test]
    fn finish_reading_keeps_previous_rating_when_none_given() {
        let mut snapshot = LibrarySnapshot::default();
        let mut ids = SequentialIds::new();
        let id = add(&mut snapshot, &mut ids, NewBook::default());

        finish_reading(&mut snapshot, id, 1, Some(9), None);
        finish_reading(&mut snapshot, id, 2, None, None);
        assert_eq!(snapshot.book(id).unwrap().rating, Some(9));

        // A new rating replaces the old one.
        finish_reading(&mut snapshot, id, 3, Some(6), None);
        assert_eq!(snapshot.book(id).unwrap().rating, Some(6));
    }

    #[test]
    fn loan_and_return_never_touch_history() {
        let mut snapshot = LibrarySnapshot::default();
        let mut ids = SequentialIds::new();
        let id = add(&mut snapshot, &mut ids, NewBook::default());
        let history_len = snapshot.book(id).unwrap().history.len();

        assert!(loan(&mut snapshot, id, "Ana".to_owned(), 5));
        {
            let book = snapshot.book(id).unwrap();
            assert!(book.loaned);
            assert_eq!(book.loaned_to.as_deref(), Some("Ana"));
            assert_eq!(book.loan_date, Some(5));
            assert_eq!(book.history.len(), history_len);
        }

        assert!(return_book(&mut snapshot, id));
        let book = snapshot.book(id).unwrap();
        assert!(!book.loaned);
        assert!(book.loaned_to.is_none());
        assert!(book.loan_date.is_none());
        assert_eq!(book.history.len(), history_len);
    }

    #[test]
    fn buy_sets_price_date_and_state() {
        let mut snapshot = LibrarySnapshot::default();
        let mut ids = SequentialIds::new();
        let id = add(&mut snapshot, &mut ids, NewBook::default());

        assert!(buy(&mut snapshot, id, Some(19.95), 7));
        let book = snapshot.book(id).unwrap();
        assert_eq!(book.price, Some(19.95));
        assert_eq!(book.purchase_date, Some(7));
        assert_eq!(book.state, ReadingState::Purchased);
    }

    #[test]
    fn missing_ids_report_false() {
        let mut snapshot = LibrarySnapshot::default();
        assert!(!change_state(
            &mut snapshot,
            EntityId(999_999),
            ReadingState::Read,
            None,
            0
        ));
        assert!(finish_reading(&mut snapshot, EntityId(999_999), 0, None, None).is_none());
        assert!(!delete(&mut snapshot, EntityId(999_999)));
        assert!(!return_book(&mut snapshot, EntityId(999_999)));
    }

    #[test]
    fn delete_removes_only_the_target() {
        let mut snapshot = LibrarySnapshot::default();
        let mut ids = SequentialIds::new();
        let keep = add(&mut snapshot, &mut ids, NewBook::default());
        let drop = add(&mut snapshot, &mut ids, NewBook::default());

        assert!(delete(&mut snapshot, drop));
        assert_eq!(snapshot.books.len(), 1);
        assert_eq!(snapshot.books[0].id, keep);
    }
}
