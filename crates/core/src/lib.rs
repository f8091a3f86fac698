//! Core business rules for the merch store.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! The database layer composes these rules inside its units of work.
//!
//! # Modules
//!
//! - `ledger` - Coin balance rules, error taxonomy, lock ordering and history views
//! - `auth` - Credential validation and password hashing
//! - `cache` - Read-side cache keyed by username

pub mod auth;
pub mod cache;
pub mod ledger;
