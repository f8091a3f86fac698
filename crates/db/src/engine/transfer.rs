//! Transfer: move coins between two accounts and record it.

use merch_core::ledger::{
    LedgerError, TransferReceipt, apply_transfer, lock_order, validate_amount,
};
use sea_orm::DatabaseTransaction;
use uuid::Uuid;

use super::{LedgerEngine, classify, commit, ensure_stored, rollback};
use crate::entities::accounts;

impl LedgerEngine {
    /// Sends `amount` coins from `from_username` to `to_username`.
    ///
    /// Both rows are locked in ascending id order whichever side is the
    /// sender, so two opposite transfers over the same pair cannot deadlock.
    /// A transfer to oneself locks the row once, moves nothing and still
    /// writes its ledger record.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `SenderNotFound` / `ReceiverNotFound` on a missing party
    /// - `InsufficientFunds` if the sender balance is below `amount`
    /// - `Transient` on lock timeout, deadlock or connection loss
    /// - `CommitFailed` if the commit itself fails
    pub async fn transfer(
        &self,
        from_username: &str,
        to_username: &str,
        amount: i64,
    ) -> Result<TransferReceipt, LedgerError> {
        let amount = validate_amount(amount)?;

        let txn = self.begin().await?;
        let receipt = match self
            .transfer_in(&txn, from_username, to_username, amount)
            .await
        {
            Ok(receipt) => receipt,
            Err(err) => return rollback(txn, err).await,
        };
        commit(txn, "transfer").await?;

        tracing::info!(
            record_id = %receipt.record_id,
            from = %receipt.from_account_id,
            to = %receipt.to_account_id,
            amount = receipt.amount,
            "transfer committed"
        );

        Ok(receipt)
    }

    async fn transfer_in(
        &self,
        txn: &DatabaseTransaction,
        from_username: &str,
        to_username: &str,
        amount: i64,
    ) -> Result<TransferReceipt, LedgerError> {
        let sender_id = self
            .accounts
            .find_by_username_on(txn, from_username)
            .await
            .map_err(classify)?
            .ok_or_else(|| LedgerError::SenderNotFound(from_username.to_string()))?
            .id;

        let receiver_id = self
            .accounts
            .find_by_username_on(txn, to_username)
            .await
            .map_err(classify)?
            .ok_or_else(|| LedgerError::ReceiverNotFound(to_username.to_string()))?
            .id;

        let self_transfer = sender_id == receiver_id;
        let (sender, receiver) = self
            .lock_pair(txn, (sender_id, from_username), (receiver_id, to_username))
            .await?;

        let (sender_after, receiver_after) =
            apply_transfer(sender.balance, receiver.balance, amount, self_transfer)?;

        if !self_transfer {
            let stored_sender = self
                .accounts
                .apply_balance_delta(txn, sender.id, -amount)
                .await
                .map_err(classify)?;
            ensure_stored(sender.id, sender_after, stored_sender)?;

            let stored_receiver = self
                .accounts
                .apply_balance_delta(txn, receiver.id, amount)
                .await
                .map_err(classify)?;
            ensure_stored(receiver.id, receiver_after, stored_receiver)?;
        }

        let record = self
            .ledger
            .append(txn, sender.id, receiver.id, amount)
            .await
            .map_err(classify)?;

        Ok(TransferReceipt {
            record_id: record.id,
            from_account_id: record.from_account_id,
            to_account_id: record.to_account_id,
            amount: record.amount,
            created_at: record.created_at.into(),
            sender_balance_after: sender_after,
            receiver_balance_after: receiver_after,
        })
    }

    /// Locks sender and receiver rows in id order and returns them as
    /// `(sender, receiver)`.
    async fn lock_pair(
        &self,
        txn: &DatabaseTransaction,
        sender: (Uuid, &str),
        receiver: (Uuid, &str),
    ) -> Result<(accounts::Model, accounts::Model), LedgerError> {
        let missing = |id: Uuid| {
            if id == sender.0 {
                LedgerError::SenderNotFound(sender.1.to_string())
            } else {
                LedgerError::ReceiverNotFound(receiver.1.to_string())
            }
        };

        let (first_id, second_id) = lock_order(sender.0, receiver.0);

        let first = self
            .accounts
            .lock_by_id(txn, first_id)
            .await
            .map_err(classify)?
            .ok_or_else(|| missing(first_id))?;

        if first_id == second_id {
            return Ok((first.clone(), first));
        }

        let second = self
            .accounts
            .lock_by_id(txn, second_id)
            .await
            .map_err(classify)?
            .ok_or_else(|| missing(second_id))?;

        if first.id == sender.0 {
            Ok((first, second))
        } else {
            Ok((second, first))
        }
    }
}
