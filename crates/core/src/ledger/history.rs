//! Splits ledger records into sent and received views.

use uuid::Uuid;

use super::types::{HistoryRecord, ReceivedCoins, SentCoins};

/// Partitions `records` from the point of view of `account_id`.
///
/// Input order is preserved in both lists. A record with the account on
/// both sides shows up in each.
pub fn partition_history(
    account_id: Uuid,
    records: &[HistoryRecord],
) -> (Vec<SentCoins>, Vec<ReceivedCoins>) {
    let sent = records
        .iter()
        .filter(|r| r.from_account_id == account_id)
        .map(|r| SentCoins {
            to_username: r.to_username.clone(),
            amount: r.amount,
        })
        .collect();

    let received = records
        .iter()
        .filter(|r| r.to_account_id == account_id)
        .map(|r| ReceivedCoins {
            from_username: r.from_username.clone(),
            amount: r.amount,
        })
        .collect();

    (sent, received)
}
