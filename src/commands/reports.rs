// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use super::{Context, as_of_arg, range_arg};
use crate::aggregate::{
    Breakdown, Lookup, TransactionFilter, category_breakdown, filter_transactions,
    monthly_trend, top_transactions,
};
use crate::models::{Ledger, TransactionType};
use crate::utils::{fmt_pct, maybe_print_json, pretty_table};

pub fn handle_trend(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let months = *sub
        .get_one::<usize>("months")
        .unwrap_or(&ctx.settings.trend_months);
    let as_of = as_of_arg(sub)?;
    let ledger = ctx.ledger(sub)?;
    let points = monthly_trend(&ledger.transactions, as_of, months);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &points)? {
        let rows = points
            .iter()
            .map(|p| {
                vec![
                    p.label.clone(),
                    format!("{:.2}", p.income),
                    format!("{:.2}", p.expense),
                    format!("{:.2}", p.net),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net"], rows)
        );
    }
    Ok(())
}

/// Breakdown restricted to the requested window.
pub fn breakdown_for(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Breakdown> {
    let direction: TransactionType = sub
        .get_one::<String>("direction")
        .map(|s| s.as_str())
        .unwrap_or("expense")
        .parse()?;
    let lookup = Lookup::new(ledger);
    let filter = TransactionFilter {
        range: range_arg(sub)?,
        ..Default::default()
    };
    let window: Vec<_> = filter_transactions(&ledger.transactions, &lookup, &filter)
        .into_iter()
        .cloned()
        .collect();
    Ok(category_breakdown(&window, &lookup, direction))
}

pub fn handle_breakdown(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ctx.ledger(sub)?;
    let b = breakdown_for(&ledger, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &b)? {
        return Ok(());
    }
    let mut rows: Vec<Vec<String>> = b
        .rows
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                format!("{:.2}", r.amount),
                fmt_pct(&r.percentage),
                r.count.to_string(),
            ]
        })
        .collect();
    if !b.unresolved.is_zero() {
        rows.push(vec![
            format!("({})", crate::aggregate::UNKNOWN_LABEL),
            format!("{:.2}", b.unresolved),
            String::new(),
            String::new(),
        ]);
    }
    rows.push(vec![
        "Total".into(),
        format!("{:.2}", b.total),
        String::new(),
        String::new(),
    ]);
    println!(
        "{}",
        pretty_table(&["Category", b.direction.as_str(), "Share", "Count"], rows)
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct RankedRow {
    pub rank: usize,
    pub date: String,
    pub description: String,
    pub kind: String,
    pub category: String,
    pub account: String,
    pub amount: String,
}

pub fn top_rows(ledger: &Ledger, n: usize) -> Vec<RankedRow> {
    let lookup = Lookup::new(ledger);
    top_transactions(&ledger.transactions, n)
        .into_iter()
        .enumerate()
        .map(|(i, t)| RankedRow {
            rank: i + 1,
            date: t.date.to_string(),
            description: t.description.clone(),
            kind: t.kind.to_string(),
            category: lookup.category_name(&t.category_id).to_string(),
            account: lookup.account_name(&t.account_id).to_string(),
            amount: format!("{:.2}", t.amount),
        })
        .collect()
}

pub fn handle_top(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let n = *sub.get_one::<usize>("limit").unwrap_or(&ctx.settings.top_n);
    let ledger = ctx.ledger(sub)?;
    let data = top_rows(&ledger, n);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.rank.to_string(),
                    r.date,
                    r.description,
                    r.kind,
                    r.category,
                    r.account,
                    r.amount,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["#", "Date", "Description", "Type", "Category", "Account", "Amount"],
                rows
            )
        );
    }
    Ok(())
}
