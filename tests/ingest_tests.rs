// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finboard::ingest::{
    IngestReport, WireAccount, WireBudget, WireCategory, WireTransaction, parse_collection,
};
use finboard::models::{AccountType, BudgetPeriod, CategoryType, TransactionType};
use rust_decimal::Decimal;

#[test]
fn transactions_accept_string_and_numeric_fields() {
    let body = r##"[
        {"id": 7, "description": " Rent ", "amount": "1250.50", "type": "expense",
         "categoryId": 3, "accountId": "acc-1", "date": "2025-04-01T00:00:00.000Z",
         "tags": ["office", 5, ""], "notes": ""},
        {"id": "t-8", "description": "Grant", "amount": 2000, "type": "INCOME",
         "categoryId": "c-1", "accountId": "acc-1", "date": "2025-04-02"}
    ]"##;
    let mut report = IngestReport::default();
    let txs = parse_collection::<WireTransaction>(body, &mut report).unwrap();

    assert!(report.is_clean());
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].id, "7");
    assert_eq!(txs[0].description, "Rent");
    assert_eq!(txs[0].amount, Decimal::from_str_exact("1250.50").unwrap());
    assert_eq!(txs[0].category_id, "3");
    assert_eq!(txs[0].date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
    assert_eq!(txs[0].tags, vec!["office".to_string()]);
    assert_eq!(txs[0].notes, None);
    assert_eq!(txs[1].kind, TransactionType::Income);
    assert_eq!(txs[1].amount, Decimal::from(2000));
}

#[test]
fn malformed_records_are_skipped_and_reported() {
    let body = r#"{"data": [
        {"id": "ok", "amount": "10", "type": "expense", "date": "2025-01-05"},
        {"id": "bad-amount", "amount": "ten", "type": "expense", "date": "2025-01-05"},
        {"id": "bad-date", "amount": "1", "type": "expense", "date": "05/01/2025"},
        {"id": "bad-type", "amount": "1", "type": "refund", "date": "2025-01-05"},
        {"id": "no-amount", "type": "income", "date": "2025-01-05"}
    ]}"#;
    let mut report = IngestReport::default();
    let txs = parse_collection::<WireTransaction>(body, &mut report).unwrap();

    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].id, "ok");
    // dangling references survive ingestion and resolve later
    assert_eq!(txs[0].category_id, "");
    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(skipped, vec!["bad-amount", "bad-date", "bad-type", "no-amount"]);
    assert!(report.skipped[0].reason.contains("ten"));
    assert!(report.skipped.iter().all(|s| s.collection == "transactions"));
}

#[test]
fn accounts_and_categories_default_optional_fields() {
    let mut report = IngestReport::default();
    let accounts = parse_collection::<WireAccount>(
        r#"[{"id": 1, "name": "Main", "type": "savings", "balance": 1500.25, "currency": "usd"},
            {"id": 2, "name": "Card", "type": "credit", "balance": "-20", "isActive": false},
            {"id": 3, "type": "checking", "balance": "1"}]"#,
        &mut report,
    )
    .unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].kind, AccountType::Savings);
    assert_eq!(accounts[0].currency, "USD");
    assert!(accounts[0].is_active);
    assert_eq!(accounts[1].balance, Decimal::from(-20));
    assert!(!accounts[1].is_active);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].collection, "accounts");

    let cats = parse_collection::<WireCategory>(
        r##"[{"id": "c", "name": "Donations", "type": "income", "color": "#16a34a", "icon": "gift"}]"##,
        &mut report,
    )
    .unwrap();
    assert_eq!(cats[0].kind, CategoryType::Income);
    assert_eq!(cats[0].icon.as_deref(), Some("gift"));
}

#[test]
fn budgets_parse_open_and_closed_windows() {
    let mut report = IngestReport::default();
    let budgets = parse_collection::<WireBudget>(
        r#"[{"id": 1, "categoryId": 4, "amount": "500", "period": "monthly",
             "startDate": "2025-01-01", "endDate": null},
            {"id": 2, "categoryId": 4, "amount": "6000", "period": "yearly",
             "startDate": "2025-01-01", "endDate": "2025-12-31T23:59:59Z"},
            {"id": 3, "categoryId": 4, "amount": "1", "period": "weekly",
             "startDate": "2025-01-01"}]"#,
        &mut report,
    )
    .unwrap();
    assert_eq!(budgets.len(), 2);
    assert_eq!(budgets[0].end_date, None);
    assert_eq!(budgets[1].period, BudgetPeriod::Yearly);
    assert_eq!(
        budgets[1].end_date,
        NaiveDate::from_ymd_opt(2025, 12, 31)
    );
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].reason.contains("weekly"));
}

#[test]
fn non_array_body_is_a_decode_error() {
    let mut report = IngestReport::default();
    assert!(parse_collection::<WireTransaction>(r#"{"error": "nope"}"#, &mut report).is_err());
}

#[test]
fn oversized_amounts_are_rejected() {
    let body = r#"[
        {"id": "huge", "amount": "50000000000000000000000000000", "type": "expense", "date": "2025-01-05"},
        {"id": "sci", "amount": "-2e20", "type": "expense", "date": "2025-01-05"},
        {"id": "edge", "amount": "1000000000000000", "type": "income", "date": "2025-01-05"},
        {"id": "huge-2", "amount": "50000000000000000000000000000", "type": "expense", "date": "2025-01-06"}
    ]"#;
    let mut report = IngestReport::default();
    let txs = parse_collection::<WireTransaction>(body, &mut report).unwrap();

    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].id, "edge");
    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(skipped, vec!["huge", "sci", "huge-2"]);

    // what survives can always be summed
    let trend = finboard::aggregate::monthly_trend(&txs, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(), 1);
    assert_eq!(trend[0].income, finboard::ingest::MAX_AMOUNT);

    let accounts = parse_collection::<WireAccount>(
        r#"[{"id": 1, "name": "Vault", "type": "savings", "balance": "-1e16"}]"#,
        &mut report,
    )
    .unwrap();
    assert!(accounts.is_empty());
}

#[test]
fn dates_with_trailing_garbage_are_rejected() {
    let body = r#"[
        {"id": "junk", "amount": "1", "type": "expense", "date": "2025-03-01garbage"},
        {"id": "spaced", "amount": "1", "type": "expense", "date": "2025-03-02 10:00:00"},
        {"id": "iso", "amount": "1", "type": "expense", "date": "2025-03-03T10:00:00Z"},
        {"id": "plain", "amount": "1", "type": "expense", "date": "2025-03-04"},
        {"id": "short", "amount": "1", "type": "expense", "date": "2025-3-5"}
    ]"#;
    let mut report = IngestReport::default();
    let txs = parse_collection::<WireTransaction>(body, &mut report).unwrap();

    let kept: Vec<&str> = txs.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(kept, vec!["spaced", "iso", "plain"]);
    assert_eq!(txs[0].date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(skipped, vec!["junk", "short"]);
}
