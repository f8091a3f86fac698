//! Purchase: debit the buyer, add one item to their inventory.

use merch_core::ledger::{LedgerError, PurchaseReceipt, debit, validate_item_name};
use sea_orm::DatabaseTransaction;

use super::{LedgerEngine, classify, commit, ensure_stored, rollback};

impl LedgerEngine {
    /// Buys one unit of `item_name` for `username`.
    ///
    /// Lock order: buyer row, then item lookup, then compare and mutate.
    ///
    /// # Errors
    ///
    /// - `EmptyItemName` if the name is blank
    /// - `AccountNotFound` / `ItemNotFound` on a missing account or item
    /// - `InsufficientFunds` if the balance is below the price
    /// - `Transient` on lock timeout, deadlock or connection loss
    /// - `CommitFailed` if the commit itself fails
    pub async fn purchase(
        &self,
        username: &str,
        item_name: &str,
    ) -> Result<PurchaseReceipt, LedgerError> {
        let item_name = validate_item_name(item_name)?;

        let txn = self.begin().await?;
        let receipt = match self.purchase_in(&txn, username, item_name).await {
            Ok(receipt) => receipt,
            Err(err) => return rollback(txn, err).await,
        };
        commit(txn, "purchase").await?;

        tracing::info!(
            account_id = %receipt.account_id,
            item = %receipt.item_name,
            price = receipt.price,
            balance = receipt.balance_after,
            quantity = receipt.quantity_after,
            "purchase committed"
        );

        Ok(receipt)
    }

    async fn purchase_in(
        &self,
        txn: &DatabaseTransaction,
        username: &str,
        item_name: &str,
    ) -> Result<PurchaseReceipt, LedgerError> {
        let account = self
            .accounts
            .lock_by_username(txn, username)
            .await
            .map_err(classify)?
            .ok_or_else(|| LedgerError::AccountNotFound(username.to_string()))?;

        let item = self
            .catalog
            .find_by_name(txn, item_name)
            .await
            .map_err(classify)?
            .ok_or_else(|| LedgerError::ItemNotFound(item_name.to_string()))?;

        let expected_balance = debit(account.balance, item.price)?;

        let balance_after = self
            .accounts
            .apply_balance_delta(txn, account.id, -item.price)
            .await
            .map_err(classify)?;
        ensure_stored(account.id, expected_balance, balance_after)?;

        let quantity_after = self
            .inventory
            .increment(txn, account.id, item.id, 1)
            .await
            .map_err(classify)?;

        Ok(PurchaseReceipt {
            account_id: account.id,
            item_name: item.name,
            price: item.price,
            balance_after,
            quantity_after,
        })
    }
}
