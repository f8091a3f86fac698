//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod catalog;
pub mod inventory;
pub mod ledger;
pub mod maintenance;

pub use account::{AccountError, AccountRepository};
pub use catalog::CatalogRepository;
pub use inventory::InventoryRepository;
pub use ledger::LedgerRepository;
pub use maintenance::MaintenanceRepository;
