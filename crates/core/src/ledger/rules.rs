//! Balance rules applied inside a unit of work.
//!
//! Callers pass balances read under an exclusive row lock. Nothing here
//! touches storage.

use uuid::Uuid;

use super::error::LedgerError;

/// Balance granted to every freshly registered account.
pub const STARTING_BALANCE: i64 = 1000;

/// Rejects zero and negative transfer amounts.
pub const fn validate_amount(amount: i64) -> Result<i64, LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Ok(amount)
}

/// Rejects empty or whitespace-only item names.
pub fn validate_item_name(name: &str) -> Result<&str, LedgerError> {
    if name.trim().is_empty() {
        return Err(LedgerError::EmptyItemName);
    }
    Ok(name)
}

/// Fails with `InsufficientFunds` if `balance < required`.
pub const fn ensure_funds(balance: i64, required: i64) -> Result<(), LedgerError> {
    if balance < required {
        return Err(LedgerError::InsufficientFunds { balance, required });
    }
    Ok(())
}

/// Subtracts `amount` from `balance`, refusing to go below zero.
pub fn debit(balance: i64, amount: i64) -> Result<i64, LedgerError> {
    ensure_funds(balance, amount)?;
    balance
        .checked_sub(amount)
        .ok_or_else(|| LedgerError::Store(format!("balance underflow: {balance} - {amount}")))
}

/// Adds `amount` to `balance`.
pub fn credit(balance: i64, amount: i64) -> Result<i64, LedgerError> {
    balance
        .checked_add(amount)
        .ok_or_else(|| LedgerError::Store(format!("balance overflow: {balance} + {amount}")))
}

/// Computes post-transfer balances `(sender, receiver)`.
///
/// The pair sum is preserved exactly. A transfer to oneself leaves the
/// balance untouched but still requires the funds to be present.
pub fn apply_transfer(
    sender_balance: i64,
    receiver_balance: i64,
    amount: i64,
    self_transfer: bool,
) -> Result<(i64, i64), LedgerError> {
    validate_amount(amount)?;
    if self_transfer {
        ensure_funds(sender_balance, amount)?;
        return Ok((sender_balance, sender_balance));
    }
    let sender = debit(sender_balance, amount)?;
    let receiver = credit(receiver_balance, amount)?;
    Ok((sender, receiver))
}

/// Returns the two ids in the order their rows must be locked.
///
/// Every transfer over the same pair acquires locks in the same order,
/// whichever side is the sender.
pub fn lock_order(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(i64::MIN)]
    fn test_rejects_non_positive_amount(#[case] amount: i64) {
        assert_eq!(
            validate_amount(amount),
            Err(LedgerError::InvalidAmount(amount))
        );
    }

    #[test]
    fn test_accepts_positive_amount() {
        assert_eq!(validate_amount(1), Ok(1));
        assert_eq!(validate_amount(100), Ok(100));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_rejects_empty_item_name(#[case] name: &str) {
        assert_eq!(validate_item_name(name), Err(LedgerError::EmptyItemName));
    }

    #[test]
    fn test_debit_exact_balance() {
        assert_eq!(debit(80, 80), Ok(0));
        assert_eq!(debit(1000, 80), Ok(920));
    }

    #[test]
    fn test_debit_insufficient() {
        assert_eq!(
            debit(79, 80),
            Err(LedgerError::InsufficientFunds {
                balance: 79,
                required: 80
            })
        );
    }

    #[test]
    fn test_credit_overflow_is_store_error() {
        assert!(matches!(credit(i64::MAX, 1), Err(LedgerError::Store(_))));
    }

    #[test]
    fn test_transfer_moves_coins() {
        assert_eq!(apply_transfer(1000, 1000, 100, false), Ok((900, 1100)));
    }

    #[test]
    fn test_self_transfer_keeps_balance() {
        assert_eq!(apply_transfer(500, 500, 100, true), Ok((500, 500)));
        assert!(matches!(
            apply_transfer(50, 50, 100, true),
            Err(LedgerError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn test_lock_order_is_symmetric() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        assert_eq!(lock_order(a, b), lock_order(b, a));
        assert_eq!(lock_order(a, a), (a, a));
    }
}
