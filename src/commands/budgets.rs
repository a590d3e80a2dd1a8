// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::Context;
use crate::aggregate::budgets_overview;
use crate::utils::{fmt_pct, maybe_print_json, pretty_table};

pub fn handle(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ctx.ledger(sub)?;
    let progress = budgets_overview(&ledger);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &progress)? {
        return Ok(());
    }

    let windows = ledger
        .budgets
        .iter()
        .map(|b| match b.end_date {
            Some(end) => format!("{} {}..{}", b.period, b.start_date, end),
            None => format!("{} {}..", b.period, b.start_date),
        });
    let rows = progress
        .iter()
        .zip(windows)
        .map(|(p, window)| {
            vec![
                p.category_name.clone(),
                window,
                format!("{:.2}", p.amount),
                format!("{:.2}", p.spent),
                format!("{:.2}", p.remaining),
                fmt_pct(&p.percentage_capped),
                p.status.as_str().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Category", "Window", "Budget", "Spent", "Remaining", "Used", "Status"],
            rows
        )
    );
    Ok(())
}
