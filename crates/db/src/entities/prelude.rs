//! Entity re-exports.

pub use super::accounts::Entity as Accounts;
pub use super::inventory::Entity as Inventory;
pub use super::items::Entity as Items;
pub use super::ledger_records::Entity as LedgerRecords;
