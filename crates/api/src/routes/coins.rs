//! Coin transfers between employees.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError, middleware::auth::AuthUser};

/// POST /sendCoin request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCoinRequest {
    /// Receiver username.
    pub to_user: String,
    /// Coins to send; must be positive.
    pub amount: i64,
}

/// POST /sendCoin response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCoinResponse {
    /// Human-readable confirmation.
    pub message: &'static str,
    /// Receiver username.
    pub to_user: String,
    /// Coins sent.
    pub amount: i64,
    /// Sender balance after the transfer.
    pub coins: i64,
}

/// Creates the coins router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/sendCoin", post(send_coin))
}

/// POST /sendCoin - Transfer coins from the caller to another account.
async fn send_coin(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SendCoinRequest>,
) -> Result<Json<SendCoinResponse>, ApiError> {
    let receipt = state
        .engine
        .transfer(user.username(), &payload.to_user, payload.amount)
        .await?;

    state.invalidate_summaries(&[user.username(), payload.to_user.as_str()]);

    Ok(Json(SendCoinResponse {
        message: "Coins sent",
        to_user: payload.to_user,
        amount: receipt.amount,
        coins: receipt.sender_balance_after,
    }))
}
