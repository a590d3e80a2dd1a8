// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IngestError;

/// Generates the lowercase string mapping shared by every ledger enum.
macro_rules! string_enum {
    ($name:ident, $field:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = IngestError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(IngestError::UnknownVariant {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Credit,
    Investment,
}

string_enum!(AccountType, "account type" {
    Checking => "checking",
    Savings => "savings",
    Credit => "credit",
    Investment => "investment",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
}

string_enum!(CategoryType, "category type" {
    Income => "income",
    Expense => "expense",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

string_enum!(TransactionType, "transaction type" {
    Income => "income",
    Expense => "expense",
    Transfer => "transfer",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Monthly,
    Yearly,
}

string_enum!(BudgetPeriod, "budget period" {
    Monthly => "monthly",
    Yearly => "yearly",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountType,
    pub balance: Decimal,
    pub currency: String,
    pub color: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category_id: String,
    pub account_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category_id: String,
    pub amount: Decimal,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl Budget {
    /// Inclusive window check; an open end date never closes.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.is_none_or(|end| date <= end)
    }
}

/// A point-in-time copy of every collection the dashboard reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub accounts: Vec<Account>,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
}

/// Result of a write against the finance API, applied locally without re-fetching.
#[derive(Debug, Clone)]
pub enum Mutation {
    Created(Transaction),
    Updated(Transaction),
    Deleted(String),
}

impl Ledger {
    /// Splices a mutation into the transaction list. Create appends, update
    /// replaces by id (appending when the id is not loaded), delete filters.
    pub fn reconcile(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::Created(tx) => self.transactions.push(tx),
            Mutation::Updated(tx) => {
                match self.transactions.iter_mut().find(|t| t.id == tx.id) {
                    Some(slot) => *slot = tx,
                    None => self.transactions.push(tx),
                }
            }
            Mutation::Deleted(id) => self.transactions.retain(|t| t.id != id),
        }
    }
}
