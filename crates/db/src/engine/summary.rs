//! Account summary: balance, inventory and transfer history.

use merch_core::ledger::{AccountSummary, HistoryRecord, LedgerError, partition_history};
use sea_orm::{AccessMode, DatabaseTransaction, IsolationLevel, TransactionTrait};
use uuid::Uuid;

use super::{LedgerEngine, classify, rollback};

impl LedgerEngine {
    /// Builds the summary for `username` from one consistent snapshot.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist, or a store
    /// error.
    pub async fn account_summary(&self, username: &str) -> Result<AccountSummary, LedgerError> {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await
            .map_err(classify)?;

        let summary = match self.summary_in(&txn, username).await {
            Ok(summary) => summary,
            Err(err) => return rollback(txn, err).await,
        };
        // Nothing was written, so a failed commit is an ordinary store error
        txn.commit().await.map_err(classify)?;

        Ok(summary)
    }

    async fn summary_in(
        &self,
        txn: &DatabaseTransaction,
        username: &str,
    ) -> Result<AccountSummary, LedgerError> {
        let account = self
            .accounts
            .find_by_username_on(txn, username)
            .await
            .map_err(classify)?
            .ok_or_else(|| LedgerError::AccountNotFound(username.to_string()))?;

        let inventory = self
            .inventory
            .list_for_account(txn, account.id)
            .await
            .map_err(classify)?;

        let records = self
            .ledger
            .list_for_account(txn, account.id)
            .await
            .map_err(classify)?;

        let mut counterparties: Vec<_> = records
            .iter()
            .flat_map(|r| [r.from_account_id, r.to_account_id])
            .collect();
        counterparties.sort_unstable();
        counterparties.dedup();

        let usernames = self
            .accounts
            .usernames_for(txn, &counterparties)
            .await
            .map_err(classify)?;
        let name_of = |id: Uuid| usernames.get(&id).cloned().unwrap_or_else(|| id.to_string());

        let history: Vec<HistoryRecord> = records
            .into_iter()
            .map(|r| HistoryRecord {
                id: r.id,
                from_username: name_of(r.from_account_id),
                from_account_id: r.from_account_id,
                to_username: name_of(r.to_account_id),
                to_account_id: r.to_account_id,
                amount: r.amount,
                created_at: r.created_at.into(),
            })
            .collect();

        let (sent, received) = partition_history(account.id, &history);

        Ok(AccountSummary {
            balance: account.balance,
            inventory,
            sent,
            received,
        })
    }
}
