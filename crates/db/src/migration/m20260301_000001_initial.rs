//! Initial database migration.
//!
//! Creates accounts, the item catalog, inventory and the append-only
//! ledger of coin transfers.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(ITEMS_SQL).await?;
        db.execute_unprepared(INVENTORY_SQL).await?;
        db.execute_unprepared(LEDGER_RECORDS_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    username VARCHAR(64) NOT NULL,
    password_hash TEXT NOT NULL,
    balance BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_accounts_username UNIQUE (username),
    CONSTRAINT chk_accounts_balance_non_negative CHECK (balance >= 0)
);
";

const ITEMS_SQL: &str = r"
CREATE TABLE items (
    id SERIAL PRIMARY KEY,
    name VARCHAR(64) NOT NULL,
    price BIGINT NOT NULL,
    CONSTRAINT uq_items_name UNIQUE (name),
    CONSTRAINT chk_items_price_positive CHECK (price > 0)
);
";

const INVENTORY_SQL: &str = r"
CREATE TABLE inventory (
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    item_id INTEGER NOT NULL REFERENCES items(id),
    quantity INTEGER NOT NULL,
    PRIMARY KEY (account_id, item_id),
    CONSTRAINT chk_inventory_quantity_positive CHECK (quantity >= 1)
);
";

const LEDGER_RECORDS_SQL: &str = r"
CREATE TABLE ledger_records (
    id UUID PRIMARY KEY,
    from_account_id UUID NOT NULL REFERENCES accounts(id),
    to_account_id UUID NOT NULL REFERENCES accounts(id),
    amount BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_ledger_records_amount_positive CHECK (amount > 0)
);

-- Sent history
CREATE INDEX idx_ledger_records_from ON ledger_records(from_account_id, created_at);

-- Received history
CREATE INDEX idx_ledger_records_to ON ledger_records(to_account_id, created_at);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: prevent_ledger_record_modification
-- Ledger records are append-only
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_ledger_record_modification()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Ledger records are append-only';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_ledger_records_append_only
BEFORE UPDATE OR DELETE ON ledger_records
FOR EACH ROW
EXECUTE FUNCTION prevent_ledger_record_modification();
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS ledger_records CASCADE;
DROP FUNCTION IF EXISTS prevent_ledger_record_modification();
DROP TABLE IF EXISTS inventory CASCADE;
DROP TABLE IF EXISTS items CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
";
