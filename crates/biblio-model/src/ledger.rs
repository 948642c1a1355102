//! The gamified reward ledger.
//!
//! The ledger runs in exactly one of two currency modes -- points or money --
//! and keeps an independent [`ModeBalance`] for each so that switching modes
//! never converts or destroys an existing balance. Credits and debits are
//! total operations: a credit of a non-positive amount is ignored, and a
//! debit can never push the current balance below zero (callers are expected
//! to check affordability before spending).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CurrencyMode
// ---------------------------------------------------------------------------

/// Which currency the reward system is accounting in.
///
/// The modes are mutually exclusive; only the active mode's balance moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencyMode {
    /// Abstract points earned by reading.
    #[serde(rename = "points")]
    Points,
    /// Virtual money (same unit as book prices).
    #[serde(rename = "money")]
    Money,
}

impl Default for CurrencyMode {
    fn default() -> Self {
        CurrencyMode::Points
    }
}

// ---------------------------------------------------------------------------
// ModeBalance
// ---------------------------------------------------------------------------

/// The accounting state of a single currency mode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeBalance {
    /// Spendable balance. Invariant: never negative.
    pub current: f64,
    /// Cumulative amount ever earned. Invariant: monotonically
    /// non-decreasing.
    pub earned: f64,
    /// Number of wishlist purchases made with this currency.
    pub purchases: u32,
}

impl ModeBalance {
    /// Add `amount` to both the current and earned balances.
    ///
    /// Non-positive amounts are ignored so that a zero-valued completion
    /// event (e.g. a zero-page book with a zero per-book rate) never creates
    /// a ledger entry.
    pub fn credit(&mut self, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        self.current += amount;
        self.earned += amount;
    }

    /// Subtract `amount` from the current balance, flooring at zero.
    ///
    /// Never fails: an overdraft clamps to zero instead of going negative.
    /// Affordability must be checked by the caller before committing to a
    /// purchase.
    pub fn debit(&mut self, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        self.current = (self.current - amount).max(0.0);
    }

    /// Whether the current balance covers `cost`.
    pub fn covers(&self, cost: f64) -> bool {
        self.current >= cost
    }
}

// ---------------------------------------------------------------------------
// RewardLedger
// ---------------------------------------------------------------------------

/// Dual-mode reward account: one balance per currency, one active mode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardLedger {
    /// The currency mode currently in effect.
    pub mode: CurrencyMode,
    /// Points-mode balance.
    pub points: ModeBalance,
    /// Money-mode balance.
    pub money: ModeBalance,
}

impl RewardLedger {
    /// The balance of the active mode.
    pub fn active(&self) -> &ModeBalance {
        match self.mode {
            CurrencyMode::Points => &self.points,
            CurrencyMode::Money => &self.money,
        }
    }

    /// Mutable balance of the active mode.
    pub fn active_mut(&mut self) -> &mut ModeBalance {
        match self.mode {
            CurrencyMode::Points => &mut self.points,
            CurrencyMode::Money => &mut self.money,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_moves_current_and_earned() {
        let mut balance = ModeBalance::default();
        balance.credit(25.0);
        assert_eq!(balance.current, 25.0);
        assert_eq!(balance.earned, 25.0);
    }

    #[test]
    fn credit_ignores_non_positive_amounts() {
        let mut balance = ModeBalance::default();
        balance.credit(0.0);
        balance.credit(-5.0);
        assert_eq!(balance, ModeBalance::default());
    }

    #[test]
    fn debit_floors_at_zero() {
        let mut balance = ModeBalance::default();
        balance.credit(10.0);
        balance.debit(25.0);
        assert_eq!(balance.current, 0.0);
        // Earned is untouched by spending.
        assert_eq!(balance.earned, 10.0);
    }

    #[test]
    fn debit_ignores_non_positive_amounts() {
        let mut balance = ModeBalance::default();
        balance.credit(10.0);
        balance.debit(-3.0);
        assert_eq!(balance.current, 10.0);
    }

    #[test]
    fn covers_checks_current_balance() {
        let mut balance = ModeBalance::default();
        balance.credit(100.0);
        assert!(balance.covers(100.0));
        assert!(!balance.covers(100.5));
    }

    #[test]
    fn mode_switch_does_not_convert_balances() {
        let mut ledger = RewardLedger::default();
        ledger.active_mut().credit(50.0);
        assert_eq!(ledger.points.current, 50.0);

        ledger.mode = CurrencyMode::Money;
        assert_eq!(ledger.active().current, 0.0);
        assert_eq!(ledger.points.current, 50.0);

        ledger.active_mut().credit(9.99);
        assert_eq!(ledger.money.current, 9.99);
        assert_eq!(ledger.points.current, 50.0);
    }

    #[test]
    fn default_mode_is_points() {
        assert_eq!(RewardLedger::default().mode, CurrencyMode::Points);
    }
}
