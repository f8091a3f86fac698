//! Property-based tests for balance rules.

use proptest::prelude::*;
use uuid::Uuid;

use super::error::LedgerError;
use super::rules::{apply_transfer, debit, lock_order};

fn balance() -> impl Strategy<Value = i64> {
    0i64..1_000_000
}

fn amount() -> impl Strategy<Value = i64> {
    1i64..1_000_000
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A debit either leaves a non-negative balance or fails with `InsufficientFunds`.
    #[test]
    fn prop_debit_never_negative(b in balance(), a in amount()) {
        match debit(b, a) {
            Ok(after) => {
                prop_assert!(after >= 0);
                prop_assert_eq!(after, b - a);
            }
            Err(LedgerError::InsufficientFunds { balance, required }) => {
                prop_assert!(b < a);
                prop_assert_eq!(balance, b);
                prop_assert_eq!(required, a);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// A transfer between two accounts conserves the pair sum.
    #[test]
    fn prop_transfer_conserves_pair(s in balance(), r in balance(), a in amount()) {
        if let Ok((s_after, r_after)) = apply_transfer(s, r, a, false) {
            prop_assert_eq!(s + r, s_after + r_after);
            prop_assert!(s_after >= 0);
        } else {
            prop_assert!(s < a);
        }
    }

    /// Non-positive amounts are rejected whatever the balances.
    #[test]
    fn prop_non_positive_amount_rejected(s in balance(), r in balance(), a in i64::MIN..=0) {
        prop_assert_eq!(apply_transfer(s, r, a, false), Err(LedgerError::InvalidAmount(a)));
    }

    /// Lock order does not depend on which side is the sender.
    #[test]
    fn prop_lock_order_symmetric(x in any::<u128>(), y in any::<u128>()) {
        let a = Uuid::from_u128(x);
        let b = Uuid::from_u128(y);
        let (first, second) = lock_order(a, b);
        prop_assert_eq!(lock_order(b, a), (first, second));
        prop_assert!(first <= second);
    }
}
