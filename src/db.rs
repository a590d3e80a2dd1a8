// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local SQLite copy of the last synced ledger, plus a small settings table.
//! A sync always replaces every ledger table wholesale.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::api::LedgerSource;
use crate::ingest::IngestReport;
use crate::models::{Account, Budget, Category, Ledger, Transaction};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Finboard", "finboard"));

const TOKEN_KEY: &str = "developer_token";
const SYNCED_AT_KEY: &str = "synced_at";

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP.0, APP.1, APP.2)
}

pub fn db_path() -> Result<PathBuf> {
    let proj = project_dirs().context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("finboard.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS accounts(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL,
        name TEXT NOT NULL,
        type TEXT NOT NULL,
        balance TEXT NOT NULL,
        currency TEXT NOT NULL,
        color TEXT,
        is_active INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL,
        name TEXT NOT NULL,
        type TEXT NOT NULL,
        color TEXT,
        icon TEXT,
        is_active INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        type TEXT NOT NULL,
        category_id TEXT NOT NULL,
        account_id TEXT NOT NULL,
        date TEXT NOT NULL,
        tags TEXT NOT NULL DEFAULT '[]',
        notes TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS budgets(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL,
        category_id TEXT NOT NULL,
        amount TEXT NOT NULL,
        period TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT
    );
    "#,
    )?;
    Ok(())
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn cached_token(conn: &Connection) -> Result<Option<String>> {
    get_setting(conn, TOKEN_KEY)
}

pub fn cache_token(conn: &Connection, token: &str) -> Result<()> {
    set_setting(conn, TOKEN_KEY, token)
}

pub fn clear_token(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key=?1", params![TOKEN_KEY])?;
    Ok(())
}

pub fn synced_at(conn: &Connection) -> Result<Option<String>> {
    get_setting(conn, SYNCED_AT_KEY)
}

/// Replaces the stored snapshot with `ledger` in one transaction.
pub fn store_ledger(conn: &mut Connection, ledger: &Ledger) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        "DELETE FROM accounts; DELETE FROM categories; DELETE FROM transactions; DELETE FROM budgets;",
    )?;
    {
        let mut st = tx.prepare(
            "INSERT INTO accounts(id, name, type, balance, currency, color, is_active)
             VALUES (?1,?2,?3,?4,?5,?6,?7)",
        )?;
        for a in &ledger.accounts {
            st.execute(params![
                a.id,
                a.name,
                a.kind.as_str(),
                a.balance.to_string(),
                a.currency,
                a.color,
                a.is_active
            ])?;
        }
        let mut st = tx.prepare(
            "INSERT INTO categories(id, name, type, color, icon, is_active)
             VALUES (?1,?2,?3,?4,?5,?6)",
        )?;
        for c in &ledger.categories {
            st.execute(params![
                c.id,
                c.name,
                c.kind.as_str(),
                c.color,
                c.icon,
                c.is_active
            ])?;
        }
        let mut st = tx.prepare(
            "INSERT INTO transactions(id, description, amount, type, category_id, account_id, date, tags, notes)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
        )?;
        for t in &ledger.transactions {
            st.execute(params![
                t.id,
                t.description,
                t.amount.to_string(),
                t.kind.as_str(),
                t.category_id,
                t.account_id,
                t.date.to_string(),
                serde_json::to_string(&t.tags)?,
                t.notes
            ])?;
        }
        let mut st = tx.prepare(
            "INSERT INTO budgets(id, category_id, amount, period, start_date, end_date)
             VALUES (?1,?2,?3,?4,?5,?6)",
        )?;
        for b in &ledger.budgets {
            st.execute(params![
                b.id,
                b.category_id,
                b.amount.to_string(),
                b.period.as_str(),
                b.start_date.to_string(),
                b.end_date.map(|d| d.to_string())
            ])?;
        }
    }
    tx.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![SYNCED_AT_KEY, chrono::Utc::now().to_rfc3339()],
    )?;
    tx.commit()?;
    debug!(
        accounts = ledger.accounts.len(),
        categories = ledger.categories.len(),
        transactions = ledger.transactions.len(),
        budgets = ledger.budgets.len(),
        "snapshot stored"
    );
    Ok(())
}

fn dec(s: String, what: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' in snapshot", what, s))
}

fn day(s: String) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' in snapshot", s))
}

pub fn load_ledger(conn: &Connection) -> Result<Ledger> {
    let mut ledger = Ledger::default();

    let mut stmt = conn.prepare(
        "SELECT id, name, type, balance, currency, color, is_active FROM accounts ORDER BY seq",
    )?;
    let mut rows = stmt.query([])?;
    while let Some(r) = rows.next()? {
        let kind: String = r.get(2)?;
        ledger.accounts.push(Account {
            id: r.get(0)?,
            name: r.get(1)?,
            kind: kind.parse()?,
            balance: dec(r.get(3)?, "balance")?,
            currency: r.get(4)?,
            color: r.get(5)?,
            is_active: r.get(6)?,
        });
    }

    let mut stmt = conn.prepare(
        "SELECT id, name, type, color, icon, is_active FROM categories ORDER BY seq",
    )?;
    let mut rows = stmt.query([])?;
    while let Some(r) = rows.next()? {
        let kind: String = r.get(2)?;
        ledger.categories.push(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            kind: kind.parse()?,
            color: r.get(3)?,
            icon: r.get(4)?,
            is_active: r.get(5)?,
        });
    }

    let mut stmt = conn.prepare(
        "SELECT id, description, amount, type, category_id, account_id, date, tags, notes
         FROM transactions ORDER BY seq",
    )?;
    let mut rows = stmt.query([])?;
    while let Some(r) = rows.next()? {
        let kind: String = r.get(3)?;
        let tags: String = r.get(7)?;
        ledger.transactions.push(Transaction {
            id: r.get(0)?,
            description: r.get(1)?,
            amount: dec(r.get(2)?, "amount")?,
            kind: kind.parse()?,
            category_id: r.get(4)?,
            account_id: r.get(5)?,
            date: day(r.get(6)?)?,
            tags: serde_json::from_str(&tags).unwrap_or_default(),
            notes: r.get(8)?,
        });
    }

    let mut stmt = conn.prepare(
        "SELECT id, category_id, amount, period, start_date, end_date FROM budgets ORDER BY seq",
    )?;
    let mut rows = stmt.query([])?;
    while let Some(r) = rows.next()? {
        let period: String = r.get(3)?;
        let end: Option<String> = r.get(5)?;
        ledger.budgets.push(Budget {
            id: r.get(0)?,
            category_id: r.get(1)?,
            amount: dec(r.get(2)?, "budget amount")?,
            period: period.parse()?,
            start_date: day(r.get(4)?)?,
            end_date: end.map(day).transpose()?,
        });
    }

    Ok(ledger)
}

/// The on-disk snapshot as a ledger source for `--offline` reports.
pub struct SnapshotStore<'c> {
    conn: &'c Connection,
}

impl<'c> SnapshotStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl LedgerSource for SnapshotStore<'_> {
    fn load_ledger(&self) -> Result<(Ledger, IngestReport)> {
        if synced_at(self.conn)?.is_none() {
            anyhow::bail!("No local snapshot yet; run `finboard sync` first");
        }
        Ok((load_ledger(self.conn)?, IngestReport::default()))
    }
}
