//! Registration and login.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use merch_core::auth::{CachedCredential, hash_password, validate_credentials, verify_password};
use merch_core::ledger::LedgerError;
use merch_db::{AccountError, AccountRepository};
use merch_shared::AppError;
use merch_shared::auth::{AuthRequest, AuthResponse, RegisterResponse};
use tracing::info;

use crate::{AppState, error::ApiError};

const INVALID_CREDENTIALS: &str = "invalid username or password";

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/auth", post(authenticate))
}

/// POST /register - Create an account with the starting balance.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<AuthRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_credentials(&payload.username, &payload.password)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let password_hash = hash_blocking(payload.password).await?;

    let account = AccountRepository::new((*state.db).clone())
        .create(&payload.username, &password_hash, state.starting_balance)
        .await
        .map_err(LedgerError::from)?;

    info!(account_id = %account.id, username = %account.username, "account registered");

    if let Some(cache) = &state.credential_cache {
        cache.insert(
            &account.username,
            CachedCredential {
                account_id: account.id,
                password_hash: account.password_hash.clone(),
            },
        );
    }

    Ok((
        StatusCode::OK,
        Json(RegisterResponse {
            username: account.username,
            coins: account.balance,
        }),
    ))
}

/// POST /auth - Exchange credentials for a bearer token.
async fn authenticate(
    State(state): State<AppState>,
    Json(payload): Json<AuthRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if validate_credentials(&payload.username, &payload.password).is_err() {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()).into());
    }

    let cached = state
        .credential_cache
        .as_ref()
        .and_then(|cache| cache.get(&payload.username));

    let mut verified = false;
    if let Some(credential) = cached {
        verified = verify_blocking(payload.password.clone(), credential.password_hash).await?;
    }

    if !verified {
        let account = AccountRepository::new((*state.db).clone())
            .find_by_username(&payload.username)
            .await
            .map_err(|e| LedgerError::from(AccountError::Database(e)))?;

        let Some(account) = account else {
            info!(username = %payload.username, "login attempt for unknown account");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()).into());
        };

        if !verify_blocking(payload.password.clone(), account.password_hash.clone()).await? {
            info!(account_id = %account.id, "failed login attempt");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()).into());
        }

        if let Some(cache) = &state.credential_cache {
            cache.insert(
                &account.username,
                CachedCredential {
                    account_id: account.id,
                    password_hash: account.password_hash,
                },
            );
        }
    }

    let token = state
        .jwt_service
        .generate_token(&payload.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(username = %payload.username, "token issued");

    Ok(Json(AuthResponse { token }))
}

/// Runs Argon2 hashing on the blocking pool.
async fn hash_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Runs Argon2 verification on the blocking pool.
async fn verify_blocking(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Internal(e.to_string()))
}
