//! `SeaORM` entity definitions.

pub mod prelude;

pub mod accounts;
pub mod inventory;
pub mod items;
pub mod ledger_records;
