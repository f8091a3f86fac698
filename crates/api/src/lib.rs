//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for registration, login, purchases and transfers
//! - Authentication middleware
//! - HTTP error mapping

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use merch_core::auth::CachedCredential;
use merch_core::cache::UsernameCache;
use merch_core::ledger::AccountSummary;
use merch_db::{EngineConfig, LedgerEngine};
use merch_shared::{AppConfig, JwtConfig, JwtService};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Upper bound on a single request, lock waits included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Ledger engine for purchases, transfers and summaries.
    pub engine: Arc<LedgerEngine>,
    /// Username to password hash side-cache (optional).
    pub credential_cache: Option<Arc<UsernameCache<CachedCredential>>>,
    /// Username to account summary side-cache (optional).
    pub summary_cache: Option<Arc<UsernameCache<AccountSummary>>>,
    /// Coins granted on registration.
    pub starting_balance: i64,
    /// Whether the bulk-reset endpoint is mounted.
    pub enable_reset: bool,
}

impl AppState {
    /// Builds the state from a connection and loaded configuration.
    #[must_use]
    pub fn from_config(db: DatabaseConnection, config: &AppConfig) -> Self {
        let jwt_service = JwtService::new(JwtConfig {
            secret: config.jwt.secret.clone(),
            token_expires_secs: i64::try_from(config.jwt.token_expiry_secs).unwrap_or(i64::MAX),
        });
        let engine = LedgerEngine::new(
            db.clone(),
            EngineConfig::from_database_config(&config.database),
        );

        let (credential_cache, summary_cache) = if config.cache.enabled {
            (
                Some(Arc::new(UsernameCache::with_config(
                    config.cache.max_capacity,
                    config.cache.ttl_secs,
                ))),
                Some(Arc::new(UsernameCache::with_config(
                    config.cache.max_capacity,
                    config.cache.ttl_secs,
                ))),
            )
        } else {
            (None, None)
        };

        Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            engine: Arc::new(engine),
            credential_cache,
            summary_cache,
            starting_balance: config.store.starting_balance,
            enable_reset: config.server.enable_reset,
        }
    }

    /// Drops cached summaries for the given usernames.
    pub fn invalidate_summaries(&self, usernames: &[&str]) {
        if let Some(cache) = &self.summary_cache {
            for username in usernames {
                cache.invalidate(username);
            }
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
