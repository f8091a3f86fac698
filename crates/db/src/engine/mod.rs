//! Ledger engine: the only component that mutates balances.
//!
//! Each operation runs as one database transaction. Balance rows are read
//! with `FOR UPDATE` and stay locked until commit or rollback, so concurrent
//! purchases and transfers touching the same account serialize on the row
//! lock instead of racing on a stale read.

mod purchase;
mod summary;
mod transfer;

use std::time::Duration;

use merch_core::ledger::LedgerError;
use merch_shared::config::DatabaseConfig;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, RuntimeErr, TransactionTrait,
};
use uuid::Uuid;

use crate::repositories::{
    AccountError, AccountRepository, CatalogRepository, InventoryRepository, LedgerRepository,
};

/// SQLSTATE codes after which the whole unit of work may be retried.
const TRANSIENT_SQLSTATES: [&str; 4] = [
    "40001", // serialization_failure
    "40P01", // deadlock_detected
    "55P03", // lock_not_available (lock_timeout)
    "57014", // query_canceled (statement_timeout)
];

/// Engine tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum wait for a row lock; `None` waits indefinitely.
    pub lock_timeout: Option<Duration>,
}

impl EngineConfig {
    /// Builds engine settings from the database section of the config.
    #[must_use]
    pub const fn from_database_config(config: &DatabaseConfig) -> Self {
        let lock_timeout = if config.lock_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(config.lock_timeout_ms))
        };
        Self { lock_timeout }
    }
}

/// Orchestrates purchases and transfers over the four stores.
#[derive(Debug, Clone)]
pub struct LedgerEngine {
    db: DatabaseConnection,
    accounts: AccountRepository,
    catalog: CatalogRepository,
    inventory: InventoryRepository,
    ledger: LedgerRepository,
    config: EngineConfig,
}

impl LedgerEngine {
    /// Creates a new ledger engine.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: EngineConfig) -> Self {
        Self {
            accounts: AccountRepository::new(db.clone()),
            catalog: CatalogRepository::new(db.clone()),
            inventory: InventoryRepository::new(),
            ledger: LedgerRepository::new(),
            db,
            config,
        }
    }

    /// Returns the engine settings.
    #[must_use]
    pub const fn config(&self) -> EngineConfig {
        self.config
    }

    /// Opens a unit of work with the configured lock timeout.
    async fn begin(&self) -> Result<DatabaseTransaction, LedgerError> {
        let txn = self.db.begin().await.map_err(classify)?;

        if let Some(timeout) = self.config.lock_timeout {
            // SET LOCAL is scoped to this transaction only
            let sql = format!("SET LOCAL lock_timeout = '{}ms'", timeout.as_millis());
            if let Err(err) = txn.execute_unprepared(&sql).await {
                return rollback(txn, classify(err)).await;
            }
        }

        Ok(txn)
    }
}

/// Commits `txn`. A failed commit leaves the outcome unknown and is fatal.
async fn commit(txn: DatabaseTransaction, operation: &'static str) -> Result<(), LedgerError> {
    txn.commit().await.map_err(|err| {
        tracing::error!(operation, error = %err, "commit failed; persisted state is uncertain");
        LedgerError::CommitFailed(err.to_string())
    })
}

/// Rolls back `txn` and returns `err`. A failing rollback is logged and never
/// replaces the original error.
async fn rollback<T>(txn: DatabaseTransaction, err: LedgerError) -> Result<T, LedgerError> {
    if let Err(rollback_err) = txn.rollback().await {
        tracing::warn!(error = %rollback_err, original = %err, "rollback failed");
    }
    Err(err)
}

/// Checks the balance returned by an update against the one the rules
/// computed from the locked row.
fn ensure_stored(account_id: Uuid, expected: i64, stored: i64) -> Result<(), LedgerError> {
    if stored == expected {
        return Ok(());
    }
    tracing::error!(%account_id, expected, stored, "balance changed under lock");
    Err(LedgerError::Store(format!(
        "balance of {account_id} changed under lock: expected {expected}, stored {stored}"
    )))
}

/// Maps a store error onto the ledger taxonomy.
pub(crate) fn classify(err: DbErr) -> LedgerError {
    if is_transient(&err) {
        tracing::warn!(error = %err, "transient store failure");
        return LedgerError::Transient(err.to_string());
    }
    tracing::error!(error = %err, "store failure");
    LedgerError::Store(err.to_string())
}

fn is_transient(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
        DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
        | DbErr::Exec(RuntimeErr::SqlxError(sqlx_err)) => match sqlx_err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => true,
            other => other
                .as_database_error()
                .and_then(|db_err| db_err.code())
                .is_some_and(|code| TRANSIENT_SQLSTATES.iter().any(|state| code == *state)),
        },
        _ => false,
    }
}

impl From<AccountError> for LedgerError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::DuplicateUsername(username) => Self::DuplicateUsername(username),
            AccountError::Database(db_err) => classify(db_err),
        }
    }
}
