use chrono::Utc;
use sea_orm::{ConnectionTrait, Statement};

use engine::{
    BalanceKey, EngineError, LedgerEvent,
    commands::{ReminderCmd, SettleCmd},
    events,
};

mod common;
use common::{engine_with_db, engine_with_events, group_with, pay};

#[tokio::test]
async fn settle_zeroes_every_row_between_the_pair() {
    let (engine, _db) = engine_with_db().await;
    let trip = group_with(&engine, "Trip", &["alice", "bob"]).await;
    let flat = group_with(&engine, "Flat", &["bob", "alice", "carol"]).await;
    pay(&engine, trip, "alice", 10_00).await;
    pay(&engine, flat, "bob", 30_00).await;

    let payment = engine
        .settle(SettleCmd::new("alice", "bob", Utc::now()))
        .await
        .unwrap();
    assert_eq!(payment.paid_by, "alice");
    assert_eq!(payment.paid_to, "bob");
    // alice was owed 5.00 in one group and owed bob 10.00 in the other.
    assert_eq!(payment.amount_minor, 5_00);

    for group in [trip, flat] {
        for (lender, borrower) in [("alice", "bob"), ("bob", "alice")] {
            let row = engine
                .balance(&BalanceKey::new(group, lender, borrower))
                .await
                .unwrap();
            assert_eq!(row.amount_minor, 0);
        }
    }

    // Rows with third parties are left alone.
    let carol = engine
        .balance(&BalanceKey::new(flat, "bob", "carol"))
        .await
        .unwrap();
    assert_eq!(carol.amount_minor, 10_00);
}

#[tokio::test]
async fn settle_records_explicit_amount_as_magnitude() {
    let (engine, _db) = engine_with_db().await;
    let trip = group_with(&engine, "Trip", &["alice", "bob"]).await;
    pay(&engine, trip, "bob", 8_00).await;

    let payment = engine
        .settle(SettleCmd::new("alice", "bob", Utc::now()).amount_minor(-4_00))
        .await
        .unwrap();
    assert_eq!(payment.amount_minor, 4_00);

    let history = engine.list_payments("bob").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, payment.id);
    assert!(engine.list_payments("carol").await.unwrap().is_empty());
}

#[tokio::test]
async fn settle_rejects_unknown_users_and_self() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .settle(SettleCmd::new("alice", "mallory", Utc::now()))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::UserNotFound("mallory".to_string()));

    let err = engine
        .settle(SettleCmd::new("alice", "alice", Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    assert!(engine.list_payments("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn settle_without_shared_groups_records_zero() {
    let (engine, _db) = engine_with_db().await;

    let payment = engine
        .settle(SettleCmd::new("carol", "dave", Utc::now()))
        .await
        .unwrap();
    assert_eq!(payment.amount_minor, 0);
}

#[tokio::test]
async fn settle_and_reminder_emit_events() {
    let (tx, mut rx) = events::channel();
    let (engine, _db) = engine_with_events(tx).await;

    let payment = engine
        .settle(SettleCmd::new("alice", "bob", Utc::now()).amount_minor(1_00))
        .await
        .unwrap();
    match rx.try_recv().unwrap() {
        LedgerEvent::Settled {
            payment_id,
            paid_to,
            ..
        } => {
            assert_eq!(payment_id, payment.id);
            assert_eq!(paid_to.email, "bob@example.com");
        }
        other => panic!("unexpected event {other:?}"),
    }

    let reminder = engine
        .send_reminder(ReminderCmd::new("bob", "carol", 2_50, Utc::now()))
        .await
        .unwrap();
    assert_eq!(reminder.sent_to, "carol");
    match rx.try_recv().unwrap() {
        LedgerEvent::ReminderSent {
            sent_by,
            sent_to,
            amount_minor,
            ..
        } => {
            assert_eq!(sent_by, "bob");
            assert_eq!(sent_to.username, "carol");
            assert_eq!(amount_minor, 2_50);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn reminder_validates_input() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .send_reminder(ReminderCmd::new("bob", "carol", 0, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .send_reminder(ReminderCmd::new("bob", "nobody", 1_00, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::UserNotFound(_)));
}

#[tokio::test]
async fn failed_settle_restores_every_row() {
    let (engine, db) = engine_with_db().await;
    let trip = group_with(&engine, "Trip", &["alice", "bob"]).await;
    pay(&engine, trip, "alice", 10_00).await;

    // The payment insert is the last write of a settlement.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE TRIGGER fail_payment BEFORE INSERT ON payments \
         BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
    ))
    .await
    .unwrap();

    let err = engine
        .settle(SettleCmd::new("alice", "bob", Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));

    let forward = engine
        .balance(&BalanceKey::new(trip, "alice", "bob"))
        .await
        .unwrap();
    let reverse = engine
        .balance(&BalanceKey::new(trip, "bob", "alice"))
        .await
        .unwrap();
    assert_eq!(forward.amount_minor, 5_00);
    assert_eq!(reverse.amount_minor, -5_00);
    assert!(engine.list_payments("alice").await.unwrap().is_empty());
}
