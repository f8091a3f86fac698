//! Database layer with `SeaORM` entities, repositories and the ledger engine.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Stores for accounts, catalog, inventory and ledger records
//! - The ledger engine that composes them inside one transaction
//! - Database migrations

pub mod engine;
pub mod entities;
pub mod migration;
pub mod repositories;

pub use engine::{EngineConfig, LedgerEngine};
pub use repositories::{
    AccountError, AccountRepository, CatalogRepository, InventoryRepository, LedgerRepository,
    MaintenanceRepository,
};

use std::time::Duration;

use merch_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options).await
}
