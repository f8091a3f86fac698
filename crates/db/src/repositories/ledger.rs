//! Ledger repository: the append-only record of coin transfers.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::ledger_records;

/// Ledger repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerRepository;

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Appends one transfer record with a server-assigned id and timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn append(
        &self,
        txn: &DatabaseTransaction,
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount: i64,
    ) -> Result<ledger_records::Model, DbErr> {
        ledger_records::ActiveModel {
            id: Set(Uuid::now_v7()),
            from_account_id: Set(from_account_id),
            to_account_id: Set(to_account_id),
            amount: Set(amount),
            created_at: Set(Utc::now().into()),
        }
        .insert(txn)
        .await
    }

    /// Lists every record where the account is sender or receiver, oldest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_account<C: ConnectionTrait>(
        &self,
        conn: &C,
        account_id: Uuid,
    ) -> Result<Vec<ledger_records::Model>, DbErr> {
        ledger_records::Entity::find()
            .filter(
                Condition::any()
                    .add(ledger_records::Column::FromAccountId.eq(account_id))
                    .add(ledger_records::Column::ToAccountId.eq(account_id)),
            )
            .order_by_asc(ledger_records::Column::CreatedAt)
            .order_by_asc(ledger_records::Column::Id)
            .all(conn)
            .await
    }
}
