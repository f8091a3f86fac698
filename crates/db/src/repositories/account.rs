//! Account repository: identity, credentials and coin balance.
//!
//! Plain reads go through the pool. Locking reads and balance updates take
//! an open transaction so the lock lives exactly as long as the unit of work.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Set, SqlErr, TransactionTrait,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::entities::accounts;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Username is already registered.
    #[error("Username '{0}' already exists")]
    DuplicateUsername(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an account by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<accounts::Model>, DbErr> {
        self.find_by_username_on(&self.db, username).await
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find_by_id(id).one(&self.db).await
    }

    /// Plain (non-locking) lookup by username on any connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        username: &str,
    ) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::Username.eq(username))
            .one(conn)
            .await
    }

    /// Reads an account by username and holds an exclusive row lock on it
    /// until `txn` ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the lock wait times out.
    pub async fn lock_by_username(
        &self,
        txn: &DatabaseTransaction,
        username: &str,
    ) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::Username.eq(username))
            .lock_exclusive()
            .one(txn)
            .await
    }

    /// Reads an account by ID and holds an exclusive row lock on it until
    /// `txn` ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the lock wait times out.
    pub async fn lock_by_id(
        &self,
        txn: &DatabaseTransaction,
        id: Uuid,
    ) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find_by_id(id)
            .lock_exclusive()
            .one(txn)
            .await
    }

    /// Adds `delta` to the balance of `id` and returns the stored result.
    ///
    /// The caller must already hold the row lock and must have checked that
    /// the result is non-negative; the table constraint rejects it otherwise.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::RecordNotFound` if the row is gone, or the underlying
    /// database error.
    pub async fn apply_balance_delta(
        &self,
        txn: &DatabaseTransaction,
        id: Uuid,
        delta: i64,
    ) -> Result<i64, DbErr> {
        let updated = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Balance,
                Expr::col(accounts::Column::Balance).add(delta),
            )
            .filter(accounts::Column::Id.eq(id))
            .exec_with_returning(txn)
            .await?;

        updated
            .into_iter()
            .next()
            .map(|account| account.balance)
            .ok_or_else(|| DbErr::RecordNotFound(format!("account {id}")))
    }

    /// Resolves account IDs to usernames.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn usernames_for<C: ConnectionTrait>(
        &self,
        conn: &C,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, String>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(ids.iter().copied()))
            .all(conn)
            .await?;

        Ok(rows.into_iter().map(|a| (a.id, a.username)).collect())
    }

    /// Creates an account with `starting_balance` coins.
    ///
    /// The existence check and the insert share one transaction; the unique
    /// constraint on `username` settles any race between the two.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::DuplicateUsername` if the name is taken.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        starting_balance: i64,
    ) -> Result<accounts::Model, AccountError> {
        let txn = self.db.begin().await?;

        let taken = accounts::Entity::find()
            .filter(accounts::Column::Username.eq(username))
            .count(&txn)
            .await?;
        if taken > 0 {
            txn.rollback().await?;
            return Err(AccountError::DuplicateUsername(username.to_string()));
        }

        let account = accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            balance: Set(starting_balance),
            created_at: Set(chrono::Utc::now().into()),
        };

        let inserted = match account.insert(&txn).await {
            Ok(model) => model,
            Err(err) if is_unique_violation(&err) => {
                txn.rollback().await?;
                return Err(AccountError::DuplicateUsername(username.to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        match txn.commit().await {
            Ok(()) => Ok(inserted),
            Err(err) if is_unique_violation(&err) => {
                Err(AccountError::DuplicateUsername(username.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
