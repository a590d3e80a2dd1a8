// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived figures for the finance dashboard: trends, breakdowns, budget
//! progress, runway, rankings and filtering.
//!
//! Every function here is pure and total. A reference that does not resolve
//! becomes [`UNKNOWN_LABEL`] and an empty denominator yields zero. Amounts
//! are bounded by [`crate::ingest::MAX_AMOUNT`] at ingestion, so plain
//! `Decimal` sums cannot overflow.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Account, Budget, Category, Ledger, Transaction, TransactionType};
use crate::utils::normalize_color;

pub const UNKNOWN_LABEL: &str = "Unknown";
pub const DEFAULT_TREND_MONTHS: usize = 6;
pub const DEFAULT_TOP_N: usize = 10;
pub const WARNING_THRESHOLD: Decimal = Decimal::from_parts(75, 0, 0, false, 0);
pub const OVER_THRESHOLD: Decimal = Decimal::from_parts(90, 0, 0, false, 0);

/// `part / whole * 100`, or zero when the ratio is undefined.
fn percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|p| p.checked_div(whole))
        .unwrap_or(Decimal::ZERO)
}

/// Id-indexed view over categories and accounts.
pub struct Lookup<'a> {
    categories: HashMap<&'a str, &'a Category>,
    accounts: HashMap<&'a str, &'a Account>,
}

impl<'a> Lookup<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self::from_parts(&ledger.categories, &ledger.accounts)
    }

    pub fn from_parts(categories: &'a [Category], accounts: &'a [Account]) -> Self {
        Self {
            categories: categories.iter().map(|c| (c.id.as_str(), c)).collect(),
            accounts: accounts.iter().map(|a| (a.id.as_str(), a)).collect(),
        }
    }

    pub fn category(&self, id: &str) -> Option<&'a Category> {
        self.categories.get(id).copied()
    }

    pub fn account(&self, id: &str) -> Option<&'a Account> {
        self.accounts.get(id).copied()
    }

    pub fn category_name(&self, id: &str) -> &'a str {
        self.category(id).map_or(UNKNOWN_LABEL, |c| c.name.as_str())
    }

    pub fn category_color(&self, id: &str) -> &'a str {
        normalize_color(self.category(id).and_then(|c| c.color.as_deref()))
    }

    pub fn account_name(&self, id: &str) -> &'a str {
        self.account(id).map_or(UNKNOWN_LABEL, |a| a.name.as_str())
    }
}

/// Inclusive date window; a missing end is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|f| date >= f) && self.to.is_none_or(|t| date <= t)
    }
}

pub fn total_balance(accounts: &[Account]) -> Decimal {
    accounts.iter().map(|a| a.balance).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Income and expense totals for the `month_count` calendar months ending at
/// `reference`'s month, oldest first. Buckets are keyed by year and month.
pub fn monthly_trend(
    transactions: &[Transaction],
    reference: NaiveDate,
    month_count: usize,
) -> Vec<TrendPoint> {
    let mut sums: HashMap<(i32, u32), (Decimal, Decimal)> = HashMap::new();
    for tx in transactions {
        let slot = sums
            .entry((tx.date.year(), tx.date.month()))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match tx.kind {
            TransactionType::Income => slot.0 += tx.amount,
            TransactionType::Expense => slot.1 += tx.amount,
            TransactionType::Transfer => {}
        }
    }

    let anchor = i64::from(reference.year()) * 12 + i64::from(reference.month0());
    (0..month_count)
        .rev()
        .map(|back| {
            let idx = anchor - back as i64;
            let year = idx.div_euclid(12) as i32;
            let month = idx.rem_euclid(12) as u32 + 1;
            let (income, expense) = sums
                .get(&(year, month))
                .copied()
                .unwrap_or((Decimal::ZERO, Decimal::ZERO));
            let label = NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b %Y").to_string())
                .unwrap_or_else(|| format!("{year}-{month:02}"));
            TrendPoint {
                label,
                year,
                month,
                income,
                expense,
                net: income - expense,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub category_id: String,
    pub name: String,
    pub color: String,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub direction: TransactionType,
    /// Sum over every transaction of this direction, resolvable or not.
    pub total: Decimal,
    /// Amount whose category is not in the lookup; excluded from `rows`.
    pub unresolved: Decimal,
    pub rows: Vec<BreakdownRow>,
}

/// Groups one direction's transactions by category, largest first.
pub fn category_breakdown(
    transactions: &[Transaction],
    lookup: &Lookup<'_>,
    direction: TransactionType,
) -> Breakdown {
    let mut total = Decimal::ZERO;
    let mut unresolved = Decimal::ZERO;
    let mut order: Vec<(&str, Decimal, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tx in transactions.iter().filter(|t| t.kind == direction) {
        total += tx.amount;
        if lookup.category(&tx.category_id).is_none() {
            unresolved += tx.amount;
            continue;
        }
        let i = *index.entry(tx.category_id.as_str()).or_insert_with(|| {
            order.push((tx.category_id.as_str(), Decimal::ZERO, 0));
            order.len() - 1
        });
        order[i].1 += tx.amount;
        order[i].2 += 1;
    }

    let mut rows: Vec<BreakdownRow> = order
        .into_iter()
        .filter(|(_, amount, _)| !amount.is_zero())
        .map(|(id, amount, count)| BreakdownRow {
            category_id: id.to_string(),
            name: lookup.category_name(id).to_string(),
            color: lookup.category_color(id).to_string(),
            amount,
            percentage: percent(amount, total).clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
            count,
        })
        .collect();
    // stable: equal amounts keep first-seen order
    rows.sort_by(|a, b| b.amount.cmp(&a.amount));

    Breakdown {
        direction,
        total,
        unresolved,
        rows,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusTier {
    /// At or past 90% of the budget; rendered with the destructive tone.
    Over,
    Warning,
    OnTrack,
}

impl StatusTier {
    pub fn from_ratio(ratio: Decimal) -> Self {
        if ratio >= OVER_THRESHOLD {
            StatusTier::Over
        } else if ratio >= WARNING_THRESHOLD {
            StatusTier::Warning
        } else {
            StatusTier::OnTrack
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTier::Over => "over",
            StatusTier::Warning => "warning",
            StatusTier::OnTrack => "on-track",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub budget_id: String,
    pub category_name: String,
    pub amount: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    /// Uncapped spent/amount percentage.
    pub ratio: Decimal,
    pub percentage_capped: Decimal,
    pub status: StatusTier,
}

/// Spending against one budget. A budget of zero (or less) has no
/// meaningful ratio; it reports 0% and is `Over` as soon as anything is spent.
pub fn budget_progress(
    budget: &Budget,
    transactions: &[Transaction],
    lookup: &Lookup<'_>,
) -> BudgetProgress {
    let spent: Decimal = transactions
        .iter()
        .filter(|t| {
            t.kind == TransactionType::Expense
                && t.category_id == budget.category_id
                && budget.covers(t.date)
        })
        .map(|t| t.amount)
        .sum();
    let ratio = percent(spent, budget.amount);
    let status = if budget.amount <= Decimal::ZERO && spent > Decimal::ZERO {
        StatusTier::Over
    } else {
        StatusTier::from_ratio(ratio)
    };
    BudgetProgress {
        budget_id: budget.id.clone(),
        category_name: lookup.category_name(&budget.category_id).to_string(),
        amount: budget.amount,
        spent,
        remaining: budget.amount - spent,
        ratio,
        percentage_capped: ratio.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
        status,
    }
}

pub fn budgets_overview(ledger: &Ledger) -> Vec<BudgetProgress> {
    let lookup = Lookup::new(ledger);
    ledger
        .budgets
        .iter()
        .map(|b| budget_progress(b, &ledger.transactions, &lookup))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Runway {
    pub total_balance: Decimal,
    pub average_expense_per_transaction: Decimal,
    pub months: u64,
}

/// Months the combined balance covers at the average expense size.
///
/// Balances of inactive accounts are included. The average is taken per
/// expense transaction, not per calendar month.
pub fn runway(accounts: &[Account], transactions: &[Transaction]) -> Runway {
    let total_balance = total_balance(accounts);
    let (sum, count) = transactions
        .iter()
        .filter(|t| t.kind == TransactionType::Expense)
        .fold((Decimal::ZERO, 0u64), |(s, n), t| (s + t.amount, n + 1));
    let average = if count == 0 {
        Decimal::ZERO
    } else {
        sum / Decimal::from(count)
    };

    // balance / (sum / count) rearranged so the rounded average never skews the floor
    let months = if average > Decimal::ZERO && total_balance > Decimal::ZERO {
        total_balance
            .checked_mul(Decimal::from(count))
            .and_then(|scaled| scaled.checked_div(sum))
            .map(|m| m.floor().to_u64().unwrap_or(u64::MAX))
            .unwrap_or(u64::MAX)
    } else {
        0
    };

    Runway {
        total_balance,
        average_expense_per_transaction: average,
        months,
    }
}

/// The `n` largest transactions by amount. Ties keep input order.
pub fn top_transactions(transactions: &[Transaction], n: usize) -> Vec<&Transaction> {
    let mut ranked: Vec<&Transaction> = transactions.iter().collect();
    ranked.sort_by(|a, b| b.amount.cmp(&a.amount));
    ranked.truncate(n);
    ranked
}

/// Conjunctive transaction filter. `None` on any field lets everything through.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub search: Option<String>,
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub account: Option<String>,
    pub range: DateRange,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction, lookup: &Lookup<'_>) -> bool {
        let category = lookup.category_name(&tx.category_id);
        let account = lookup.account_name(&tx.account_id);

        if let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = needle.to_lowercase();
            let hit = [tx.description.as_str(), category, account]
                .iter()
                .any(|hay| hay.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        self.kind.is_none_or(|k| tx.kind == k)
            && self.category.as_deref().is_none_or(|c| c == category)
            && self.account.as_deref().is_none_or(|a| a == account)
            && self.range.contains(tx.date)
    }
}

pub fn filter_transactions<'t>(
    transactions: &'t [Transaction],
    lookup: &Lookup<'_>,
    filter: &TransactionFilter,
) -> Vec<&'t Transaction> {
    transactions
        .iter()
        .filter(|t| filter.matches(t, lookup))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub range: DateRange,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    pub savings_rate: Decimal,
    pub count: usize,
}

/// Headline totals over a date window.
pub fn summarize(transactions: &[Transaction], range: DateRange) -> PeriodSummary {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    let mut count = 0;
    for tx in transactions.iter().filter(|t| range.contains(t.date)) {
        count += 1;
        match tx.kind {
            TransactionType::Income => income += tx.amount,
            TransactionType::Expense => expense += tx.amount,
            TransactionType::Transfer => {}
        }
    }
    let net = income - expense;
    PeriodSummary {
        range,
        income,
        expense,
        net,
        savings_rate: percent(net, income),
        count,
    }
}
