//! Domain types returned by ledger operations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Result of a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    /// Buyer account.
    pub account_id: Uuid,
    /// Item name as stored in the catalog.
    pub item_name: String,
    /// Price debited.
    pub price: i64,
    /// Buyer balance after commit.
    pub balance_after: i64,
    /// Owned quantity of the item after commit.
    pub quantity_after: i32,
}

/// Result of a successful transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    /// Ledger record id.
    pub record_id: Uuid,
    /// Sender account.
    pub from_account_id: Uuid,
    /// Receiver account.
    pub to_account_id: Uuid,
    /// Coins moved.
    pub amount: i64,
    /// Server-assigned timestamp.
    pub created_at: DateTime<Utc>,
    /// Sender balance after commit.
    pub sender_balance_after: i64,
    /// Receiver balance after commit.
    pub receiver_balance_after: i64,
}

/// A ledger record as seen by the read side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    /// Record id.
    pub id: Uuid,
    /// Sender account id.
    pub from_account_id: Uuid,
    /// Sender username.
    pub from_username: String,
    /// Receiver account id.
    pub to_account_id: Uuid,
    /// Receiver username.
    pub to_username: String,
    /// Coins moved.
    pub amount: i64,
    /// When the record was appended.
    pub created_at: DateTime<Utc>,
}

/// One owned item type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryLine {
    /// Item name.
    #[serde(rename = "type")]
    pub item_name: String,
    /// Owned quantity, always at least 1.
    pub quantity: i32,
}

/// Outgoing transfer as shown in a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentCoins {
    /// Receiver username.
    #[serde(rename = "toUser")]
    pub to_username: String,
    /// Coins sent.
    pub amount: i64,
}

/// Incoming transfer as shown in a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceivedCoins {
    /// Sender username.
    #[serde(rename = "fromUser")]
    pub from_username: String,
    /// Coins received.
    pub amount: i64,
}

/// Balance, inventory and transfer history of one account.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountSummary {
    /// Current coin balance.
    pub balance: i64,
    /// Owned items.
    pub inventory: Vec<InventoryLine>,
    /// Transfers where the account is the sender.
    pub sent: Vec<SentCoins>,
    /// Transfers where the account is the receiver.
    pub received: Vec<ReceivedCoins>,
}
