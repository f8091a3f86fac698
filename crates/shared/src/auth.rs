//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username).
    pub sub: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(username: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the username the token was issued to.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.sub
    }
}

/// Credentials payload shared by registration and login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthRequest {
    /// Username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Bearer token.
    pub token: String,
}

/// Registration response payload.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    /// Username of the new account.
    pub username: String,
    /// Starting balance.
    pub coins: i64,
}
