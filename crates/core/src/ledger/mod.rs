//! Coin ledger rules.
//!
//! This module implements the storage-independent half of the ledger:
//! - Amount and item-name validation
//! - Checked debit/credit arithmetic that never goes negative
//! - Deterministic lock ordering for two-account operations
//! - Error taxonomy shared by purchases, transfers and registration
//! - Account summary views and history partitioning

pub mod error;
pub mod history;
pub mod rules;
pub mod types;

#[cfg(test)]
mod rules_props;

pub use error::{ErrorKind, LedgerError};
pub use history::partition_history;
pub use rules::{
    STARTING_BALANCE, apply_transfer, credit, debit, ensure_funds, lock_order, validate_amount,
    validate_item_name,
};
pub use types::{
    AccountSummary, HistoryRecord, InventoryLine, PurchaseReceipt, ReceivedCoins, SentCoins,
    TransferReceipt,
};
