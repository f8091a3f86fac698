//! Inventory repository: owned item counts per account.

use merch_core::ledger::InventoryLine;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use crate::entities::{inventory, items};

/// Inventory repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryRepository;

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Adds `delta` to the owned quantity of `item_id`, inserting the row at
    /// `delta` if the account does not own the item yet. Returns the new
    /// quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub async fn increment(
        &self,
        txn: &DatabaseTransaction,
        account_id: Uuid,
        item_id: i32,
        delta: i32,
    ) -> Result<i32, DbErr> {
        let row = inventory::ActiveModel {
            account_id: Set(account_id),
            item_id: Set(item_id),
            quantity: Set(delta),
        };

        let on_conflict = OnConflict::columns([inventory::Column::AccountId, inventory::Column::ItemId])
            .value(
                inventory::Column::Quantity,
                Expr::col((inventory::Entity, inventory::Column::Quantity)).add(delta),
            )
            .to_owned();

        let stored = inventory::Entity::insert(row)
            .on_conflict(on_conflict)
            .exec_with_returning(txn)
            .await?;

        Ok(stored.quantity)
    }

    /// Lists owned items for an account, by item name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_account<C: ConnectionTrait>(
        &self,
        conn: &C,
        account_id: Uuid,
    ) -> Result<Vec<InventoryLine>, DbErr> {
        let rows = inventory::Entity::find()
            .filter(inventory::Column::AccountId.eq(account_id))
            .find_also_related(items::Entity)
            .order_by_asc(items::Column::Name)
            .all(conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(slot, item)| {
                item.map(|item| InventoryLine {
                    item_name: item.name,
                    quantity: slot.quantity,
                })
            })
            .collect())
    }
}
