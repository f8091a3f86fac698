//! Account summary for the authenticated user.

use axum::{Json, Router, extract::State, routing::get};
use merch_core::ledger::{AccountSummary, InventoryLine, ReceivedCoins, SentCoins};
use serde::Serialize;

use crate::{AppState, error::ApiError, middleware::auth::AuthUser};

/// Transfer history split by direction.
#[derive(Debug, Serialize)]
pub struct CoinHistory {
    /// Incoming transfers.
    pub received: Vec<ReceivedCoins>,
    /// Outgoing transfers.
    pub sent: Vec<SentCoins>,
}

/// GET /info response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    /// Current balance.
    pub coins: i64,
    /// Owned items.
    pub inventory: Vec<InventoryLine>,
    /// Transfer history.
    pub coin_history: CoinHistory,
}

impl From<AccountSummary> for InfoResponse {
    fn from(summary: AccountSummary) -> Self {
        Self {
            coins: summary.balance,
            inventory: summary.inventory,
            coin_history: CoinHistory {
                received: summary.received,
                sent: summary.sent,
            },
        }
    }
}

/// Creates the info router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/info", get(info))
}

/// GET /info - Balance, inventory and coin history. Served from the summary
/// cache when fresh; writes invalidate it.
async fn info(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<InfoResponse>, ApiError> {
    let username = user.username();

    if let Some(summary) = state
        .summary_cache
        .as_ref()
        .and_then(|cache| cache.get(username))
    {
        return Ok(Json(summary.into()));
    }

    // Taken before the read so a write committed meanwhile wins
    let generation = state.summary_cache.as_ref().map(|cache| cache.generation());

    let summary = state.engine.account_summary(username).await?;

    if let (Some(cache), Some(generation)) = (&state.summary_cache, generation) {
        cache.insert_if_unchanged(username, generation, summary.clone());
    }

    Ok(Json(summary.into()))
}
