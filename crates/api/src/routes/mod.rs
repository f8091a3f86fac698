//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod admin;
pub mod auth;
pub mod coins;
pub mod health;
pub mod info;
pub mod shop;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let mut protected_routes = Router::new()
        .merge(info::routes())
        .merge(coins::routes())
        .merge(shop::routes());

    if state.enable_reset {
        protected_routes = protected_routes.merge(admin::routes());
    }

    let protected_routes =
        protected_routes.layer(middleware::from_fn_with_state(state, auth_middleware));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
