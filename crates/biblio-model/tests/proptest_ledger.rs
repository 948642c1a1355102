//! Property tests for the reward ledger.
//!
//! These tests use `proptest` to generate random sequences of ledger
//! operations and verify the accounting invariants after each sequence.

use biblio_model::prelude::*;
use proptest::prelude::*;

/// Operations we can perform on the ledger.
#[derive(Debug, Clone)]
enum LedgerOp {
    Credit(f64),
    Debit(f64),
    SwitchMode,
}

/// Strategy that generates finite, sensible amounts (including negatives and
/// zero, which the ledger must ignore).
fn amount() -> impl Strategy<Value = f64> {
    (-10_000i32..100_000i32).prop_map(|v| v as f64 * 0.01)
}

fn ledger_op_strategy() -> impl Strategy<Value = LedgerOp> {
    prop_oneof![
        amount().prop_map(LedgerOp::Credit),
        amount().prop_map(LedgerOp::Debit),
        Just(LedgerOp::SwitchMode),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn ledger_random_ops_preserve_invariants(
        ops in prop::collection::vec(ledger_op_strategy(), 1..100)
    ) {
        let mut ledger = RewardLedger::default();
        let mut previous_points_earned = 0.0;
        let mut previous_money_earned = 0.0;

        for op in ops {
            match op {
                LedgerOp::Credit(amount) => ledger.active_mut().credit(amount),
                LedgerOp::Debit(amount) => ledger.active_mut().debit(amount),
                LedgerOp::SwitchMode => {
                    ledger.mode = match ledger.mode {
                        CurrencyMode::Points => CurrencyMode::Money,
                        CurrencyMode::Money => CurrencyMode::Points,
                    };
                }
            }

            // Current balances never go negative, in either mode.
            prop_assert!(ledger.points.current >= 0.0);
            prop_assert!(ledger.money.current >= 0.0);

            // Earned totals are monotonically non-decreasing.
            prop_assert!(ledger.points.earned >= previous_points_earned);
            prop_assert!(ledger.money.earned >= previous_money_earned);
            previous_points_earned = ledger.points.earned;
            previous_money_earned = ledger.money.earned;

            // Spending can only ever reduce current below earned, never the
            // other way around.
            prop_assert!(ledger.points.current <= ledger.points.earned);
            prop_assert!(ledger.money.current <= ledger.money.earned);
        }
    }
}
