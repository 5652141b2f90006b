//! Concurrency properties: no lost updates, no double-spends, no deadlocks.

use std::{sync::Arc, time::Duration};

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use ledger::{Category, CreditCmd, DebitCmd, Ledger, LedgerError, TransferCmd};
use migration::MigratorTrait;

async fn ledger_with_db() -> (Arc<Ledger>, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let ledger = Ledger::builder().database(db.clone()).build().await.unwrap();
    (Arc::new(ledger), db)
}

async fn seed_account(db: &DatabaseConnection, balance: i64) -> Uuid {
    let id = Uuid::new_v4();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (id, first_name, last_name, phone_number, address, pin, balance, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        vec![
            id.to_string().into(),
            "Grace".into(),
            "Hopper".into(),
            id.to_string().into(),
            "".into(),
            "pin-hash".into(),
            balance.into(),
            "2026-01-01 00:00:00".into(),
            "2026-01-01 00:00:00".into(),
        ],
    ))
    .await
    .unwrap();
    id
}

async fn balance_of(ledger: &Ledger, account_id: Uuid) -> i64 {
    ledger.account(account_id).await.unwrap().balance
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_debits_spend_the_balance_exactly_once() {
    let (ledger, db) = ledger_with_db().await;
    let account = seed_account(&db, 500).await;

    // Ten debits of 100 against a balance of 500: exactly five fit, the rest
    // must bounce off InsufficientFunds without touching anything.
    let mut handles = Vec::new();
    for _ in 0..10 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger
                .debit(DebitCmd::new(account, 100, Category::Payment))
                .await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(entry) => {
                assert_eq!(entry.balance_after, entry.balance_before - 100);
                succeeded += 1;
            }
            Err(err) => {
                assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
            }
        }
    }

    assert_eq!(succeeded, 5);
    assert_eq!(balance_of(&ledger, account).await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_credits_observe_a_serial_history() {
    let (ledger, db) = ledger_with_db().await;
    let account = seed_account(&db, 0).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger
                .credit(CreditCmd::new(account, 10, Category::TopUp))
                .await
                .unwrap()
        }));
    }

    let mut entries = Vec::new();
    for handle in handles {
        entries.push(handle.await.unwrap());
    }

    assert_eq!(balance_of(&ledger, account).await, 80);

    // Each balance_before must equal the previous entry's balance_after:
    // a total order with no lost update.
    entries.sort_by_key(|e| e.balance_before);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.balance_before, i as i64 * 10);
        assert_eq!(entry.balance_after, (i as i64 + 1) * 10);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn opposite_transfers_on_one_pair_do_not_deadlock() {
    let (ledger, db) = ledger_with_db().await;
    let a = seed_account(&db, 1000).await;
    let b = seed_account(&db, 1000).await;

    let forward = {
        let ledger = ledger.clone();
        tokio::spawn(async move {
            for _ in 0..5 {
                ledger
                    .transfer(TransferCmd::new(a, b, 100))
                    .await
                    .unwrap();
            }
        })
    };
    let backward = {
        let ledger = ledger.clone();
        tokio::spawn(async move {
            for _ in 0..5 {
                ledger
                    .transfer(TransferCmd::new(b, a, 50))
                    .await
                    .unwrap();
            }
        })
    };

    tokio::time::timeout(Duration::from_secs(30), async {
        forward.await.unwrap();
        backward.await.unwrap();
    })
    .await
    .expect("transfers deadlocked");

    assert_eq!(balance_of(&ledger, a).await, 1000 - 5 * 100 + 5 * 50);
    assert_eq!(balance_of(&ledger, b).await, 1000 + 5 * 100 - 5 * 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn transfers_on_disjoint_pairs_proceed_in_parallel() {
    let (ledger, db) = ledger_with_db().await;
    let a = seed_account(&db, 400).await;
    let b = seed_account(&db, 0).await;
    let c = seed_account(&db, 400).await;
    let d = seed_account(&db, 0).await;

    let first = {
        let ledger = ledger.clone();
        tokio::spawn(async move {
            for _ in 0..4 {
                ledger
                    .transfer(TransferCmd::new(a, b, 100))
                    .await
                    .unwrap();
            }
        })
    };
    let second = {
        let ledger = ledger.clone();
        tokio::spawn(async move {
            for _ in 0..4 {
                ledger
                    .transfer(TransferCmd::new(c, d, 100))
                    .await
                    .unwrap();
            }
        })
    };

    first.await.unwrap();
    second.await.unwrap();

    assert_eq!(balance_of(&ledger, a).await, 0);
    assert_eq!(balance_of(&ledger, b).await, 400);
    assert_eq!(balance_of(&ledger, c).await, 0);
    assert_eq!(balance_of(&ledger, d).await, 400);
}
