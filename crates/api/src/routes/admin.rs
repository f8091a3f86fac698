//! Bulk reset for test harnesses. Mounted only when `server.enable_reset`
//! is set.

use axum::{Json, Router, extract::State, routing::post};
use merch_db::MaintenanceRepository;
use merch_shared::AppError;
use serde_json::{Value, json};
use tracing::warn;

use crate::{AppState, error::ApiError, middleware::auth::AuthUser};

/// Creates the admin router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/reset", post(reset))
}

/// POST /admin/reset - Empty accounts, inventory and the ledger.
async fn reset(State(state): State<AppState>, user: AuthUser) -> Result<Json<Value>, ApiError> {
    MaintenanceRepository::new((*state.db).clone())
        .reset()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if let Some(cache) = &state.credential_cache {
        cache.invalidate_all();
    }
    if let Some(cache) = &state.summary_cache {
        cache.invalidate_all();
    }

    warn!(requested_by = %user.username(), "store reset");

    Ok(Json(json!({ "message": "Store reset" })))
}
