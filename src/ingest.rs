// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Boundary between the loosely typed finance API payloads and the strict
//! ledger model. Records are parsed once here; a record that cannot be
//! parsed is skipped and logged so the rest of the collection still loads.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::IngestError;
use crate::models::{Account, Budget, Category, Transaction};

/// Largest accepted magnitude for an amount or balance (10^15). Keeps every
/// ledger-wide sum well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

/// Decodes a collection body, accepting a bare array or a `{"data": [...]}` wrapper.
pub fn decode_collection<W: DeserializeOwned>(body: &str) -> Result<Vec<W>, serde_json::Error> {
    let env: Envelope<W> = serde_json::from_str(body)?;
    Ok(match env {
        Envelope::Bare(v) => v,
        Envelope::Wrapped { data } => data,
    })
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Skipped {
    pub collection: &'static str,
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct IngestReport {
    pub skipped: Vec<Skipped>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

pub trait WireRecord: DeserializeOwned {
    type Model;
    const COLLECTION: &'static str;

    fn id_hint(&self) -> String;
    fn into_model(self) -> Result<Self::Model, IngestError>;
}

/// Converts wire records, dropping the ones that fail validation.
pub fn ingest<W: WireRecord>(records: Vec<W>, report: &mut IngestReport) -> Vec<W::Model> {
    let mut out = Vec::with_capacity(records.len());
    for rec in records {
        let id = rec.id_hint();
        match rec.into_model() {
            Ok(m) => out.push(m),
            Err(e) => {
                warn!(collection = W::COLLECTION, id = %id, error = %e, "skipping record");
                report.skipped.push(Skipped {
                    collection: W::COLLECTION,
                    id,
                    reason: e.to_string(),
                });
            }
        }
    }
    out
}

/// Decode and ingest in one step.
pub fn parse_collection<W: WireRecord>(
    body: &str,
    report: &mut IngestReport,
) -> Result<Vec<W::Model>, serde_json::Error> {
    let records = decode_collection::<W>(body)?;
    Ok(ingest(records, report))
}

fn id_text(v: &Option<Value>) -> Option<String> {
    match v {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn required_id(field: &'static str, v: &Option<Value>) -> Result<String, IngestError> {
    id_text(v).ok_or(IngestError::MissingField(field))
}

fn decimal(field: &'static str, v: &Option<Value>) -> Result<Decimal, IngestError> {
    let raw = match v {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            return Err(IngestError::InvalidDecimal {
                field,
                value: other.to_string(),
            });
        }
        None => return Err(IngestError::MissingField(field)),
    };
    let value = match raw.parse::<Decimal>().or_else(|_| Decimal::from_scientific(&raw)) {
        Ok(v) => v,
        Err(_) => return Err(IngestError::InvalidDecimal { field, value: raw }),
    };
    if value.abs() > MAX_AMOUNT {
        return Err(IngestError::AmountOutOfRange { field, value: raw });
    }
    Ok(value)
}

/// Accepts `YYYY-MM-DD` or a full ISO timestamp, keeping only the calendar date.
fn date(field: &'static str, v: Option<&str>) -> Result<NaiveDate, IngestError> {
    let s = v.map(str::trim).ok_or(IngestError::MissingField(field))?;
    let day = match s.as_bytes().get(10) {
        None | Some(b'T') | Some(b' ') => s.get(..10),
        Some(_) => None,
    };
    day.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .ok_or_else(|| IngestError::InvalidDate {
            field,
            value: s.to_string(),
        })
}

fn variant<T: std::str::FromStr<Err = IngestError>>(
    field: &'static str,
    v: Option<&str>,
) -> Result<T, IngestError> {
    v.ok_or(IngestError::MissingField(field))?.parse()
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAccount {
    id: Option<Value>,
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    balance: Option<Value>,
    currency: Option<String>,
    color: Option<String>,
    is_active: Option<bool>,
}

impl WireRecord for WireAccount {
    type Model = Account;
    const COLLECTION: &'static str = "accounts";

    fn id_hint(&self) -> String {
        id_text(&self.id).unwrap_or_default()
    }

    fn into_model(self) -> Result<Account, IngestError> {
        Ok(Account {
            id: required_id("id", &self.id)?,
            name: non_empty(self.name).ok_or(IngestError::MissingField("name"))?,
            kind: variant("type", self.kind.as_deref())?,
            balance: decimal("balance", &self.balance)?,
            currency: non_empty(self.currency)
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| "USD".to_string()),
            color: non_empty(self.color),
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCategory {
    id: Option<Value>,
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    color: Option<String>,
    icon: Option<String>,
    is_active: Option<bool>,
}

impl WireRecord for WireCategory {
    type Model = Category;
    const COLLECTION: &'static str = "categories";

    fn id_hint(&self) -> String {
        id_text(&self.id).unwrap_or_default()
    }

    fn into_model(self) -> Result<Category, IngestError> {
        Ok(Category {
            id: required_id("id", &self.id)?,
            name: non_empty(self.name).ok_or(IngestError::MissingField("name"))?,
            kind: variant("type", self.kind.as_deref())?,
            color: non_empty(self.color),
            icon: non_empty(self.icon),
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTransaction {
    id: Option<Value>,
    description: Option<String>,
    amount: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<String>,
    category_id: Option<Value>,
    account_id: Option<Value>,
    date: Option<String>,
    tags: Option<Value>,
    notes: Option<String>,
}

impl WireRecord for WireTransaction {
    type Model = Transaction;
    const COLLECTION: &'static str = "transactions";

    fn id_hint(&self) -> String {
        id_text(&self.id).unwrap_or_default()
    }

    fn into_model(self) -> Result<Transaction, IngestError> {
        let tags = match &self.tags {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|t| t.as_str().map(|s| s.trim().to_string()))
                .filter(|s| !s.is_empty())
                .collect(),
            _ => Vec::new(),
        };
        Ok(Transaction {
            id: required_id("id", &self.id)?,
            description: self.description.unwrap_or_default().trim().to_string(),
            amount: decimal("amount", &self.amount)?,
            kind: variant("type", self.kind.as_deref())?,
            // Dangling or absent references resolve to "Unknown" downstream.
            category_id: id_text(&self.category_id).unwrap_or_default(),
            account_id: id_text(&self.account_id).unwrap_or_default(),
            date: date("date", self.date.as_deref())?,
            tags,
            notes: non_empty(self.notes),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBudget {
    id: Option<Value>,
    category_id: Option<Value>,
    amount: Option<Value>,
    period: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

impl WireRecord for WireBudget {
    type Model = Budget;
    const COLLECTION: &'static str = "budgets";

    fn id_hint(&self) -> String {
        id_text(&self.id).unwrap_or_default()
    }

    fn into_model(self) -> Result<Budget, IngestError> {
        let end_date = match non_empty(self.end_date) {
            Some(s) => Some(date("endDate", Some(&s))?),
            None => None,
        };
        Ok(Budget {
            id: required_id("id", &self.id)?,
            category_id: id_text(&self.category_id).unwrap_or_default(),
            amount: decimal("amount", &self.amount)?,
            period: variant("period", self.period.as_deref())?,
            start_date: date("startDate", self.start_date.as_deref())?,
            end_date,
        })
    }
}
