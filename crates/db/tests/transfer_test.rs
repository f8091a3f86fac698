//! Transfer integration tests.

mod common;

use merch_core::ledger::{LedgerError, ReceivedCoins, SentCoins};
use merch_db::entities::ledger_records;
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

async fn records_between(test_db: &common::TestDb, a: Uuid, b: Uuid) -> u64 {
    ledger_records::Entity::find()
        .filter(
            Condition::any()
                .add(ledger_records::Column::FromAccountId.is_in([a, b]))
                .add(ledger_records::Column::ToAccountId.is_in([a, b])),
        )
        .count(&test_db.db)
        .await
        .expect("count records")
}

#[tokio::test]
async fn test_transfer_moves_coins_and_records() {
    let Some(test_db) = common::setup().await else {
        return;
    };
    let engine = test_db.engine();
    let sender = test_db.account("sender", 1000).await;
    let receiver = test_db.account("receiver", 1000).await;

    let receipt = engine
        .transfer(&sender, &receiver, 100)
        .await
        .expect("transfer");
    assert_eq!(receipt.amount, 100);
    assert_eq!(receipt.sender_balance_after, 900);
    assert_eq!(receipt.receiver_balance_after, 1100);

    let sender_summary = engine.account_summary(&sender).await.unwrap();
    assert_eq!(sender_summary.balance, 900);
    assert_eq!(
        sender_summary.sent,
        vec![SentCoins {
            to_username: receiver.clone(),
            amount: 100
        }]
    );
    assert!(sender_summary.received.is_empty());

    let receiver_summary = engine.account_summary(&receiver).await.unwrap();
    assert_eq!(receiver_summary.balance, 1100);
    assert_eq!(
        receiver_summary.received,
        vec![ReceivedCoins {
            from_username: sender.clone(),
            amount: 100
        }]
    );
    assert!(receiver_summary.sent.is_empty());

    assert_eq!(
        records_between(&test_db, receipt.from_account_id, receipt.to_account_id).await,
        1
    );
}

#[tokio::test]
async fn test_non_positive_amount_rejected() {
    let Some(test_db) = common::setup().await else {
        return;
    };
    let engine = test_db.engine();
    let a = test_db.account("a", 1000).await;
    let b = test_db.account("b", 1000).await;

    assert_eq!(
        engine.transfer(&a, &b, 0).await,
        Err(LedgerError::InvalidAmount(0))
    );
    assert_eq!(
        engine.transfer(&a, &b, -50).await,
        Err(LedgerError::InvalidAmount(-50))
    );

    assert_eq!(test_db.balance(&a).await, 1000);
    assert_eq!(test_db.balance(&b).await, 1000);
    assert!(engine.account_summary(&a).await.unwrap().sent.is_empty());
}

#[tokio::test]
async fn test_insufficient_funds_rolls_back() {
    let Some(test_db) = common::setup().await else {
        return;
    };
    let engine = test_db.engine();
    let a = test_db.account("a", 50).await;
    let b = test_db.account("b", 0).await;

    assert_eq!(
        engine.transfer(&a, &b, 51).await,
        Err(LedgerError::InsufficientFunds {
            balance: 50,
            required: 51
        })
    );
    assert_eq!(test_db.balance(&a).await, 50);
    assert_eq!(test_db.balance(&b).await, 0);
    assert!(engine.account_summary(&b).await.unwrap().received.is_empty());
}

#[tokio::test]
async fn test_missing_parties() {
    let Some(test_db) = common::setup().await else {
        return;
    };
    let engine = test_db.engine();
    let real = test_db.account("real", 1000).await;
    let ghost = common::unique_username("ghost");

    assert_eq!(
        engine.transfer(&ghost, &real, 10).await,
        Err(LedgerError::SenderNotFound(ghost.clone()))
    );
    assert_eq!(
        engine.transfer(&real, &ghost, 10).await,
        Err(LedgerError::ReceiverNotFound(ghost.clone()))
    );
    assert_eq!(test_db.balance(&real).await, 1000);
}

#[tokio::test]
async fn test_self_transfer_keeps_balance_and_records_once() {
    let Some(test_db) = common::setup().await else {
        return;
    };
    let engine = test_db.engine();
    let me = test_db.account("me", 1000).await;

    let receipt = engine.transfer(&me, &me, 100).await.expect("self transfer");
    assert_eq!(receipt.from_account_id, receipt.to_account_id);
    assert_eq!(receipt.sender_balance_after, 1000);

    let summary = engine.account_summary(&me).await.unwrap();
    assert_eq!(summary.balance, 1000);
    assert_eq!(summary.sent.len(), 1);
    assert_eq!(summary.received.len(), 1);
    assert_eq!(
        records_between(&test_db, receipt.from_account_id, receipt.to_account_id).await,
        1
    );

    assert!(matches!(
        engine.transfer(&me, &me, 1001).await,
        Err(LedgerError::InsufficientFunds { .. })
    ));
}

#[tokio::test]
async fn test_history_order_and_both_directions() {
    let Some(test_db) = common::setup().await else {
        return;
    };
    let engine = test_db.engine();
    let a = test_db.account("a", 1000).await;
    let b = test_db.account("b", 1000).await;

    engine.transfer(&a, &b, 10).await.unwrap();
    engine.transfer(&b, &a, 3).await.unwrap();
    engine.transfer(&a, &b, 20).await.unwrap();

    let summary = engine.account_summary(&a).await.unwrap();
    assert_eq!(summary.balance, 1000 - 10 + 3 - 20);
    assert_eq!(
        summary.sent.iter().map(|s| s.amount).collect::<Vec<_>>(),
        vec![10, 20]
    );
    assert_eq!(
        summary.received,
        vec![ReceivedCoins {
            from_username: b.clone(),
            amount: 3
        }]
    );
}
