//! Account summary integration tests.

mod common;

use merch_core::ledger::{InventoryLine, LedgerError};

#[tokio::test]
async fn test_fresh_account_summary() {
    let Some(test_db) = common::setup().await else {
        return;
    };
    let engine = test_db.engine();
    let user = test_db.account("fresh", 1000).await;

    let summary = engine.account_summary(&user).await.unwrap();
    assert_eq!(summary.balance, 1000);
    assert!(summary.inventory.is_empty());
    assert!(summary.sent.is_empty());
    assert!(summary.received.is_empty());
}

#[tokio::test]
async fn test_unknown_account_summary() {
    let Some(test_db) = common::setup().await else {
        return;
    };
    let ghost = common::unique_username("ghost");

    assert_eq!(
        test_db.engine().account_summary(&ghost).await,
        Err(LedgerError::AccountNotFound(ghost.clone()))
    );
}

#[tokio::test]
async fn test_summary_combines_purchases_and_transfers() {
    let Some(test_db) = common::setup().await else {
        return;
    };
    let engine = test_db.engine();
    let buyer = test_db.account("buyer", 1000).await;
    let friend = test_db.account("friend", 1000).await;

    engine.purchase(&buyer, "umbrella").await.unwrap();
    engine.transfer(&friend, &buyer, 250).await.unwrap();
    engine.purchase(&buyer, "umbrella").await.unwrap();

    let summary = engine.account_summary(&buyer).await.unwrap();
    assert_eq!(summary.balance, 1000 - 200 + 250 - 200);
    assert_eq!(
        summary.inventory,
        vec![InventoryLine {
            item_name: "umbrella".into(),
            quantity: 2
        }]
    );
    assert_eq!(summary.received.len(), 1);
    assert_eq!(summary.received[0].from_username, friend);
}

#[tokio::test]
async fn test_reset_clears_accounts_but_keeps_catalog() {
    let Some(test_db) = common::setup_isolated().await else {
        return;
    };
    let engine = test_db.engine();
    let a = test_db.account("a", 1000).await;
    let b = test_db.account("b", 1000).await;
    engine.purchase(&a, "book").await.unwrap();
    engine.transfer(&a, &b, 1).await.unwrap();

    merch_db::MaintenanceRepository::new(test_db.db.clone())
        .reset()
        .await
        .unwrap();

    assert!(test_db.accounts().find_by_username(&a).await.unwrap().is_none());
    assert_eq!(
        merch_db::CatalogRepository::new(test_db.db.clone())
            .list_all()
            .await
            .unwrap()
            .len(),
        10
    );
}
