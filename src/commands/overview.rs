// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{Context, as_of_arg, range_arg};
use crate::aggregate::{DateRange, PeriodSummary, Runway, runway, summarize, total_balance};
use crate::models::Ledger;
use crate::utils::{fmt_money, fmt_pct, maybe_print_json, pretty_table};

#[derive(Debug, Serialize)]
pub struct Overview {
    pub total_balance: Decimal,
    pub active_accounts: usize,
    pub period: PeriodSummary,
    pub runway: Runway,
}

/// Without `--from`/`--to` the period is the month of `as_of`.
pub fn build(ledger: &Ledger, range: DateRange, as_of: NaiveDate) -> Overview {
    let range = if range == DateRange::default() {
        DateRange::new(as_of.with_day(1), Some(as_of))
    } else {
        range
    };
    Overview {
        total_balance: total_balance(&ledger.accounts),
        active_accounts: ledger.accounts.iter().filter(|a| a.is_active).count(),
        period: summarize(&ledger.transactions, range),
        runway: runway(&ledger.accounts, &ledger.transactions),
    }
}

pub fn handle(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ctx.ledger(sub)?;
    let ov = build(&ledger, range_arg(sub)?, as_of_arg(sub)?);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &ov)? {
        return Ok(());
    }
    let ccy = &ctx.settings.currency;
    let period = match (ov.period.range.from, ov.period.range.to) {
        (Some(f), Some(t)) => format!("{} .. {}", f, t),
        (Some(f), None) => format!("{} ..", f),
        (None, Some(t)) => format!(".. {}", t),
        (None, None) => "all time".to_string(),
    };
    let rows = vec![
        vec!["Total balance".into(), fmt_money(&ov.total_balance, ccy)],
        vec!["Active accounts".into(), ov.active_accounts.to_string()],
        vec!["Period".into(), period],
        vec!["Income".into(), fmt_money(&ov.period.income, ccy)],
        vec!["Expense".into(), fmt_money(&ov.period.expense, ccy)],
        vec!["Net".into(), fmt_money(&ov.period.net, ccy)],
        vec!["Savings rate".into(), fmt_pct(&ov.period.savings_rate)],
        vec!["Transactions".into(), ov.period.count.to_string()],
        vec!["Runway (months)".into(), ov.runway.months.to_string()],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}

pub fn handle_runway(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ctx.ledger(sub)?;
    let r = runway(&ledger.accounts, &ledger.transactions);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &r)? {
        let ccy = &ctx.settings.currency;
        let rows = vec![vec![
            fmt_money(&r.total_balance, ccy),
            fmt_money(&r.average_expense_per_transaction, ccy),
            r.months.to_string(),
        ]];
        println!(
            "{}",
            pretty_table(&["Balance", "Avg expense / txn", "Runway (months)"], rows)
        );
    }
    Ok(())
}
