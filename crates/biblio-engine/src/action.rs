//! The closed set of actions the engine understands.
//!
//! Every user intent is expressed as one [`Action`] variant. The set is
//! closed: the engine dispatches with an exhaustive `match`, so "unknown
//! action kind" is unrepresentable by construction. Silent recovery survives
//! for the other failure categories (missing entity ids, unaffordable
//! purchases) -- those actions leave the snapshot unchanged.
//!
//! Timestamps are optional everywhere; when absent, the engine substitutes
//! the injected clock's current time.

use serde::{Deserialize, Serialize};

use biblio_model::book::ReadingState;
use biblio_model::config::RewardConfig;
use biblio_model::id::{EntityId, Timestamp};
use biblio_model::ledger::CurrencyMode;
use biblio_model::snapshot::PartialSnapshot;

// ---------------------------------------------------------------------------
// Creation payloads
// ---------------------------------------------------------------------------

/// Data for a book about to be created. The id is assigned by the engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewBook {
    /// Title.
    pub title: String,
    /// Author.
    pub author: String,
    /// Page count.
    pub pages: u32,
    /// Initial state. Defaults to the wishlist.
    pub state: Option<ReadingState>,
    /// Saga name. Names a saga that may not exist yet; the engine creates
    /// and links it on the fly.
    pub saga: Option<String>,
}

/// Data for a manga collection about to be created.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewCollection {
    /// Series title.
    pub title: String,
    /// Total number of volumes in the series.
    pub total_volumes: u32,
    /// Price of one volume.
    pub price_per_volume: f64,
}

/// Data for a volume about to be added to a collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewVolume {
    /// Sequence number within the collection.
    pub number: u32,
    /// Initial state. Defaults to the wishlist.
    pub state: Option<ReadingState>,
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A typed state-transition request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    // -- books --------------------------------------------------------------
    /// Insert a new book (fresh id, seeded history, saga auto-created).
    AddBook(NewBook),
    /// Move a book to a new reading state.
    ChangeBookState {
        /// Target book.
        id: EntityId,
        /// The state to enter.
        state: ReadingState,
        /// Optional history annotation overriding the default label.
        note: Option<String>,
    },
    /// Record a completed read-through: session, rating, completion rewards.
    FinishReading {
        /// Target book.
        id: EntityId,
        /// When the book was finished. Defaults to now.
        date: Option<Timestamp>,
        /// Rating for this read (1-10).
        rating: Option<u8>,
        /// Review text for this read.
        review: Option<String>,
    },
    /// Give up on a book.
    AbandonBook {
        /// Target book.
        id: EntityId,
        /// Optional history annotation.
        note: Option<String>,
    },
    /// Record an ordinary purchase (outside the reward system).
    BuyBook {
        /// Target book.
        id: EntityId,
        /// Price paid.
        price: Option<f64>,
        /// Purchase date. Defaults to now.
        date: Option<Timestamp>,
    },
    /// Lend a book out. Sets the loan flag and metadata only; loan status is
    /// side information and never touches the state history.
    LoanBook {
        /// Target book.
        id: EntityId,
        /// Borrower.
        to: String,
        /// Loan date. Defaults to now.
        date: Option<Timestamp>,
    },
    /// Take a lent book back, clearing the loan metadata.
    ReturnBook {
        /// Target book.
        id: EntityId,
    },
    /// Remove a book entirely. Sagas it belonged to are re-derived and
    /// pruned if left empty.
    DeleteBook {
        /// Target book.
        id: EntityId,
    },

    // -- manga --------------------------------------------------------------
    /// Insert a new manga collection.
    AddCollection(NewCollection),
    /// Add a volume to a collection.
    AddVolume {
        /// Target collection.
        collection_id: EntityId,
        /// The volume to create.
        volume: NewVolume,
    },
    /// Move a volume to a new state.
    ChangeVolumeState {
        /// Owning collection.
        collection_id: EntityId,
        /// Target volume.
        volume_id: EntityId,
        /// The state to enter.
        state: ReadingState,
        /// Optional history annotation.
        note: Option<String>,
    },
    /// Mark a volume as purchased.
    BuyVolume {
        /// Owning collection.
        collection_id: EntityId,
        /// Target volume.
        volume_id: EntityId,
        /// Purchase date. Defaults to now.
        date: Option<Timestamp>,
    },
    /// Mark a volume as read, with completion rewards.
    ReadVolume {
        /// Owning collection.
        collection_id: EntityId,
        /// Target volume.
        volume_id: EntityId,
        /// Read date. Defaults to now.
        date: Option<Timestamp>,
        /// Rating (1-10).
        rating: Option<u8>,
        /// Review text.
        review: Option<String>,
    },
    /// Remove a volume from its collection.
    RemoveVolume {
        /// Owning collection.
        collection_id: EntityId,
        /// Target volume.
        volume_id: EntityId,
    },
    /// Remove a collection and all its volumes.
    DeleteCollection {
        /// Target collection.
        id: EntityId,
    },

    // -- reward purchases ---------------------------------------------------
    /// Spend points to unlock a wishlist book. No-op unless rewards are
    /// enabled, points mode is active, the book is on the wishlist, and the
    /// balance covers the unlock cost.
    BuyBookWithPoints {
        /// Target book.
        id: EntityId,
    },
    /// Spend virtual money to unlock a wishlist book. The cost is dynamic:
    /// `pages * money_cost_per_page`.
    BuyBookWithMoney {
        /// Target book.
        id: EntityId,
    },

    // -- configuration & snapshot -------------------------------------------
    /// Replace the reward configuration wholesale.
    UpdateConfig(RewardConfig),
    /// Switch the ledger's currency mode. Balances are never converted.
    SetCurrencyMode(CurrencyMode),
    /// Merge a partial snapshot (restore/migration), then re-derive all
    /// aggregates.
    ImportSnapshot(PartialSnapshot),
    /// Remember a barcode scan (history capped, oldest evicted).
    RecordScan {
        /// The scanned code.
        code: String,
        /// Scan time. Defaults to now.
        date: Option<Timestamp>,
    },
    /// Remember a search term (history capped, oldest evicted).
    RecordSearch {
        /// The search term.
        term: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_serialize_round_trip() {
        let actions = vec![
            Action::AddBook(NewBook {
                title: "Dune".to_owned(),
                author: "Frank Herbert".to_owned(),
                pages: 412,
                state: Some(ReadingState::ToRead),
                saga: Some("Dune".to_owned()),
            }),
            Action::FinishReading {
                id: EntityId(1),
                date: None,
                rating: Some(9),
                review: None,
            },
            Action::BuyBookWithPoints { id: EntityId(1) },
            Action::SetCurrencyMode(CurrencyMode::Money),
        ];
        for action in actions {
            let json = serde_json::to_string(&action).unwrap();
            let back: Action = serde_json::from_str(&json).unwrap();
            assert_eq!(back, action);
        }
    }

    #[test]
    fn new_book_defaults_to_wishlist_intent() {
        let book = NewBook::default();
        assert!(book.state.is_none());
        assert!(book.saga.is_none());
    }
}
