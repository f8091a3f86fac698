//! Seeds demo employee accounts for local development and load testing.
//!
//! Creates `employee-0001` .. `employee-NNNN`, all sharing one password, each
//! with the configured starting balance. Existing accounts are left alone, so
//! the seeder can be re-run.
//!
//! Usage: `seeder [count]` (default 100). Password comes from
//! `SEED_PASSWORD` (default `password`).

use anyhow::Context;
use merch_core::auth::hash_password;
use merch_db::{AccountError, AccountRepository, CatalogRepository, connect};
use merch_shared::AppConfig;
use tracing::info;

const DEFAULT_COUNT: usize = 100;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seeder=info,merch_db=info".into()),
        )
        .init();

    let count = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<usize>()
            .with_context(|| format!("invalid account count: {arg}"))?,
        None => DEFAULT_COUNT,
    };
    let password = std::env::var("SEED_PASSWORD").unwrap_or_else(|_| "password".to_string());

    let config = AppConfig::load().context("failed to load configuration")?;
    let db = connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let catalog = CatalogRepository::new(db.clone()).list_all().await?;
    anyhow::ensure!(
        !catalog.is_empty(),
        "item catalog is empty; run `migrator up` first"
    );
    info!(items = catalog.len(), "catalog present");

    // One hash shared by every demo account keeps seeding fast
    let password_hash = hash_password(&password).context("failed to hash seed password")?;
    let accounts = AccountRepository::new(db);

    let mut created = 0;
    let mut skipped = 0;
    for i in 1..=count {
        let username = format!("employee-{i:04}");
        match accounts
            .create(&username, &password_hash, config.store.starting_balance)
            .await
        {
            Ok(_) => created += 1,
            Err(AccountError::DuplicateUsername(_)) => skipped += 1,
            Err(e) => return Err(e).with_context(|| format!("failed to create {username}")),
        }
    }

    info!(
        created,
        skipped,
        starting_balance = config.store.starting_balance,
        "seeding complete"
    );
    Ok(())
}
