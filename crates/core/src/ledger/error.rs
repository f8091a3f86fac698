//! Ledger error types.
//!
//! Every failure of a purchase, transfer, registration or summary read is a
//! `LedgerError`. The coarse [`ErrorKind`] drives rollback policy and the
//! client-facing status; the variant carries the human-readable reason.

use merch_shared::AppError;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    // ========== Not Found ==========
    /// Acting account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Transfer sender does not exist.
    #[error("Sender not found: {0}")]
    SenderNotFound(String),

    /// Transfer receiver does not exist.
    #[error("Receiver not found: {0}")]
    ReceiverNotFound(String),

    /// Catalog has no item with this name.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    // ========== Invalid Input ==========
    /// Item name is empty.
    #[error("Item name must not be empty")]
    EmptyItemName,

    /// Transfer amount is zero or negative.
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(i64),

    // ========== Business Rules ==========
    /// Balance does not cover the debit.
    #[error("Insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds {
        /// Balance read under lock.
        balance: i64,
        /// Amount the operation needed.
        required: i64,
    },

    /// Username is already registered.
    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    // ========== Store Failures ==========
    /// Lock timeout, deadlock, serialization failure or lost connection.
    #[error("Transient store failure: {0}")]
    Transient(String),

    /// Commit was attempted and failed; persisted state is uncertain.
    #[error("Commit failed: {0}")]
    CommitFailed(String),

    /// Any other store failure.
    #[error("Store error: {0}")]
    Store(String),
}

/// Coarse classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Account or item missing.
    NotFound,
    /// Malformed request parameters.
    InvalidInput,
    /// Balance does not cover the operation.
    InsufficientFunds,
    /// Uniqueness violation.
    Conflict,
    /// Safe to retry the whole operation from scratch.
    Transient,
    /// Outcome unknown or store broken; surface loudly.
    Fatal,
}

impl LedgerError {
    /// Returns the taxonomy bucket for this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFound(_)
            | Self::SenderNotFound(_)
            | Self::ReceiverNotFound(_)
            | Self::ItemNotFound(_) => ErrorKind::NotFound,
            Self::EmptyItemName | Self::InvalidAmount(_) => ErrorKind::InvalidInput,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::DuplicateUsername(_) => ErrorKind::Conflict,
            Self::Transient(_) => ErrorKind::Transient,
            Self::CommitFailed(_) | Self::Store(_) => ErrorKind::Fatal,
        }
    }

    /// Whether the caller may retry the whole operation.
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transient)
    }

    /// Whether this is a business-rule failure rather than a store failure.
    pub const fn is_business(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NotFound
                | ErrorKind::InvalidInput
                | ErrorKind::InsufficientFunds
                | ErrorKind::Conflict
        )
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::InvalidInput => Self::Validation(message),
            ErrorKind::InsufficientFunds => Self::InsufficientFunds(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::Transient => Self::Transient(message),
            ErrorKind::Fatal => Self::Fatal(message),
        }
    }
}
