//! Bulk maintenance used by test harnesses.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};

/// Maintenance repository.
#[derive(Debug, Clone)]
pub struct MaintenanceRepository {
    db: DatabaseConnection,
}

impl MaintenanceRepository {
    /// Creates a new maintenance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Empties accounts, inventory and the ledger. The item catalog stays.
    ///
    /// # Errors
    ///
    /// Returns an error if the truncate fails.
    pub async fn reset(&self) -> Result<(), DbErr> {
        self.db
            .execute_unprepared("TRUNCATE ledger_records, inventory, accounts")
            .await?;
        Ok(())
    }
}
