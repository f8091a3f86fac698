//! Merch purchases.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;

use crate::{AppState, error::ApiError, middleware::auth::AuthUser};

/// GET /buy/{item} response.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    /// Human-readable confirmation.
    pub message: &'static str,
    /// Item bought.
    pub item: String,
    /// Balance after the purchase.
    pub coins: i64,
    /// Owned quantity of the item after the purchase.
    pub quantity: i32,
}

/// Creates the shop router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/buy/{item}", get(buy))
}

/// GET /buy/{item} - Buy one unit of an item.
async fn buy(
    State(state): State<AppState>,
    user: AuthUser,
    Path(item): Path<String>,
) -> Result<Json<PurchaseResponse>, ApiError> {
    let receipt = state.engine.purchase(user.username(), &item).await?;

    state.invalidate_summaries(&[user.username()]);

    Ok(Json(PurchaseResponse {
        message: "Item purchased",
        item: receipt.item_name,
        coins: receipt.balance_after,
        quantity: receipt.quantity_after,
    }))
}
