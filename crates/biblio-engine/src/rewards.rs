//! Reward computation and the currency abstraction.
//!
//! All completion handlers go through [`Currency`], a view over the active
//! mode's balance and the reward rates. The view exists so that the points
//! and money schemes share one code path: crediting, debiting, affordability
//! checks, and purchase pricing are parameterized by
//! [`CurrencyMode`](biblio_model::ledger::CurrencyMode) instead of being
//! duplicated per action.
//!
//! Completion bonuses (saga, collection) are awarded only on a strict
//! `false -> true` flip of the completion flag, detected by the engine with a
//! before/after comparison around the integrity recomputation. Recomputing an
//! already-complete aggregate never re-awards.

use biblio_model::book::Book;
use biblio_model::config::RewardConfig;
use biblio_model::ledger::{CurrencyMode, ModeBalance};
use biblio_model::snapshot::LibrarySnapshot;

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

/// Mode-parameterized view over the active balance and the reward rates.
pub struct Currency<'a> {
    config: &'a RewardConfig,
    balance: &'a mut ModeBalance,
    mode: CurrencyMode,
}

impl<'a> Currency<'a> {
    /// Borrow the active currency from a snapshot.
    ///
    /// Returns `None` when the reward system is disabled; every reward hook
    /// becomes a no-op through that path.
    pub fn active(snapshot: &'a mut LibrarySnapshot) -> Option<Self> {
        if !snapshot.config.enabled {
            return None;
        }
        let LibrarySnapshot { ledger, config, .. } = snapshot;
        let mode = ledger.mode;
        Some(Self {
            config,
            balance: ledger.active_mut(),
            mode,
        })
    }

    /// The mode this view is accounting in.
    pub fn mode(&self) -> CurrencyMode {
        self.mode
    }

    /// Credit the active balance.
    pub fn credit(&mut self, amount: f64) {
        if amount > 0.0 {
            tracing::debug!(mode = ?self.mode, amount, "reward credited");
        }
        self.balance.credit(amount);
    }

    /// Debit the active balance (floored at zero by the ledger).
    pub fn debit(&mut self, amount: f64) {
        self.balance.debit(amount);
    }

    /// Whether the active balance covers `cost`.
    pub fn can_afford(&self, cost: f64) -> bool {
        self.balance.covers(cost)
    }

    /// Count one wishlist purchase against the active mode.
    pub fn record_purchase(&mut self) {
        self.balance.purchases += 1;
    }

    /// What unlocking `book` from the wishlist costs in the active mode.
    ///
    /// Points mode charges the flat unlock cost; money mode prices each book
    /// dynamically at `pages * money_cost_per_page`.
    pub fn purchase_cost(&self, book: &Book) -> f64 {
        match self.mode {
            CurrencyMode::Points => self.config.wishlist_unlock_cost,
            CurrencyMode::Money => f64::from(book.pages) * self.config.money_cost_per_page,
        }
    }

    /// Reward for finishing a book of `pages` pages, plus the saga bonus
    /// when the book's saga just became complete.
    fn book_reward(&self, pages: u32, saga_newly_complete: bool) -> f64 {
        let mut amount = self.config.per_book + f64::from(pages) * self.config.per_page;
        if saga_newly_complete {
            amount += self.config.saga_bonus;
        }
        amount
    }

    /// Reward for reading a volume, plus the collection bonus when the
    /// collection just became complete.
    fn volume_reward(&self, collection_newly_complete: bool) -> f64 {
        let mut amount = self.config.per_volume;
        if collection_newly_complete {
            amount += self.config.collection_bonus;
        }
        amount
    }
}

// ---------------------------------------------------------------------------
// Completion hooks
// ---------------------------------------------------------------------------

/// Credit the reward for a finished book. No-op when rewards are disabled.
pub fn on_book_finished(snapshot: &mut LibrarySnapshot, pages: u32, saga_newly_complete: bool) {
    if let Some(mut currency) = Currency::active(snapshot) {
        let amount = currency.book_reward(pages, saga_newly_complete);
        currency.credit(amount);
    }
}

/// Credit the reward for a read volume. No-op when rewards are disabled.
pub fn on_volume_read(snapshot: &mut LibrarySnapshot, collection_newly_complete: bool) {
    if let Some(mut currency) = Currency::active(snapshot) {
        let amount = currency.volume_reward(collection_newly_complete);
        currency.credit(amount);
    }
}

/// Credit the collection-completion bonus alone (the collection filled up
/// through an action other than a read, e.g. adding the final volume).
pub fn on_collection_completed(snapshot: &mut LibrarySnapshot) {
    if let Some(mut currency) = Currency::active(snapshot) {
        let amount = currency.config.collection_bonus;
        currency.credit(amount);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
