//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - Credential shape validation for registration and login

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use thiserror::Error;
use uuid::Uuid;

/// Maximum username length, matching the `accounts.username` column.
pub const MAX_USERNAME_LEN: usize = 64;

/// Errors for malformed credentials.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// Username is empty.
    #[error("username must not be empty")]
    EmptyUsername,

    /// Username exceeds the column width.
    #[error("username must be at most {MAX_USERNAME_LEN} characters")]
    UsernameTooLong,

    /// Username contains whitespace.
    #[error("username must not contain whitespace")]
    UsernameWhitespace,

    /// Password is empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Checks the shape of a username/password pair.
///
/// # Errors
///
/// Returns the first rule the pair violates.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), CredentialError> {
    if username.is_empty() {
        return Err(CredentialError::EmptyUsername);
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(CredentialError::UsernameTooLong);
    }
    if username.chars().any(char::is_whitespace) {
        return Err(CredentialError::UsernameWhitespace);
    }
    if password.is_empty() {
        return Err(CredentialError::EmptyPassword);
    }
    Ok(())
}

/// Credential entry kept in the login side-cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedCredential {
    /// Account the hash belongs to.
    pub account_id: Uuid,
    /// Argon2 PHC string.
    pub password_hash: String,
}
