//! Shared configuration, errors, and auth types for the merch store.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error taxonomy
//! - Layered configuration
//! - JWT issuance and validation
//! - Auth request/response payloads

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod jwt_tests;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
