// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finboard::api::LedgerSource;
use finboard::db::{self, SnapshotStore};
use finboard::models::{
    Account, AccountType, Budget, BudgetPeriod, Category, CategoryType, Ledger, Mutation,
    Transaction, TransactionType,
};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn tx(id: &str, amount: &str, day: u32) -> Transaction {
    Transaction {
        id: id.into(),
        description: format!("Supplies {id}"),
        amount: amount.parse().unwrap(),
        kind: TransactionType::Expense,
        category_id: "c1".into(),
        account_id: "a1".into(),
        date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
        tags: vec!["camp".into(), "summer".into()],
        notes: Some("receipt in drive".into()),
    }
}

fn sample() -> Ledger {
    Ledger {
        accounts: vec![Account {
            id: "a1".into(),
            name: "Operating".into(),
            kind: AccountType::Checking,
            balance: Decimal::from_str_exact("1234.56").unwrap(),
            currency: "USD".into(),
            color: Some("#0ea5e9".into()),
            is_active: true,
        }],
        categories: vec![Category {
            id: "c1".into(),
            name: "Programs".into(),
            kind: CategoryType::Expense,
            color: None,
            icon: Some("tent".into()),
            is_active: true,
        }],
        transactions: vec![tx("t1", "19.99", 2), tx("t2", "5", 3)],
        budgets: vec![Budget {
            id: "b1".into(),
            category_id: "c1".into(),
            amount: Decimal::from(300),
            period: BudgetPeriod::Monthly,
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: None,
        }],
    }
}

#[test]
fn snapshot_store_requires_a_sync() {
    let conn = setup();
    let err = SnapshotStore::new(&conn).load_ledger().unwrap_err();
    assert!(err.to_string().contains("sync"));
}

#[test]
fn stored_snapshot_reads_back_in_fetch_order() {
    let mut conn = setup();
    let ledger = sample();
    db::store_ledger(&mut conn, &ledger).unwrap();
    assert!(db::synced_at(&conn).unwrap().is_some());

    let (loaded, report) = SnapshotStore::new(&conn).load_ledger().unwrap();
    assert!(report.is_clean());
    assert_eq!(loaded, ledger);
}

#[test]
fn sync_replaces_previous_snapshot() {
    let mut conn = setup();
    db::store_ledger(&mut conn, &sample()).unwrap();

    let mut smaller = sample();
    smaller.transactions.truncate(1);
    smaller.budgets.clear();
    db::store_ledger(&mut conn, &smaller).unwrap();

    let loaded = db::load_ledger(&conn).unwrap();
    assert_eq!(loaded.transactions.len(), 1);
    assert!(loaded.budgets.is_empty());
}

#[test]
fn reconcile_appends_replaces_and_filters() {
    let mut ledger = sample();

    ledger.reconcile(Mutation::Created(tx("t3", "7", 4)));
    assert_eq!(ledger.transactions.last().unwrap().id, "t3");

    let mut edited = tx("t1", "25", 2);
    edited.description = "Supplies (corrected)".into();
    ledger.reconcile(Mutation::Updated(edited));
    assert_eq!(ledger.transactions[0].amount, Decimal::from(25));
    assert_eq!(ledger.transactions.len(), 3);

    ledger.reconcile(Mutation::Updated(tx("t9", "1", 5)));
    assert_eq!(ledger.transactions.len(), 4);

    ledger.reconcile(Mutation::Deleted("t2".into()));
    let ids: Vec<&str> = ledger.transactions.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t3", "t9"]);
}

#[test]
fn token_cache_round_trip() {
    let conn = setup();
    assert!(db::cached_token(&conn).unwrap().is_none());
    db::cache_token(&conn, "dev-123").unwrap();
    db::cache_token(&conn, "dev-456").unwrap();
    assert_eq!(db::cached_token(&conn).unwrap().as_deref(), Some("dev-456"));
    db::clear_token(&conn).unwrap();
    assert!(db::cached_token(&conn).unwrap().is_none());
}
