//! Reward-system configuration.
//!
//! A flat record of named tunables consumed verbatim by the reward
//! computation. The defaults below are the documented fallback constants; no
//! other defaults are invented anywhere in the engine.

use serde::{Deserialize, Serialize};

/// Tunables for the reward system.
///
/// The active currency mode lives on the ledger itself (it is account state,
/// not a rate), so this record only carries the on/off toggle and the rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Master switch. When off, no completion event credits the ledger and
    /// reward purchases are no-ops.
    pub enabled: bool,
    /// Reward for finishing a book.
    pub per_book: f64,
    /// Reward per page read.
    pub per_page: f64,
    /// One-time bonus when a saga becomes complete.
    pub saga_bonus: f64,
    /// Reward for finishing a manga volume.
    pub per_volume: f64,
    /// One-time bonus when a manga collection becomes complete.
    pub collection_bonus: f64,
    /// Points-mode cost of unlocking one wishlist purchase.
    pub wishlist_unlock_cost: f64,
    /// Money-mode price per page: a wishlist book costs
    /// `pages * money_cost_per_page`. Pricing is per-book variable by
    /// design, not a flat fee.
    pub money_cost_per_page: f64,
}

impl Default for RewardConfig {
    /// The documented fallback constants.
    fn default() -> Self {
        Self {
            enabled: true,
            per_book: 10.0,
            per_page: 1.0,
            saga_bonus: 50.0,
            per_volume: 5.0,
            collection_bonus: 20.0,
            wishlist_unlock_cost: 100.0,
            money_cost_per_page: 0.05,
        }
    }
}
