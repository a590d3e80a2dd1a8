// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::Context;
use crate::aggregate::total_balance;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ctx.ledger(sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &ledger.accounts)? {
        return Ok(());
    }
    let mut accounts: Vec<_> = ledger.accounts.iter().collect();
    accounts.sort_by(|a, b| a.name.cmp(&b.name));
    let mut data: Vec<Vec<String>> = accounts
        .into_iter()
        .map(|a| {
            vec![
                a.name.clone(),
                a.kind.to_string(),
                a.currency.clone(),
                format!("{:.2}", a.balance),
                if a.is_active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    data.push(vec![
        "Total".into(),
        String::new(),
        ctx.settings.currency.clone(),
        format!("{:.2}", total_balance(&ledger.accounts)),
        String::new(),
    ]);
    println!(
        "{}",
        pretty_table(&["Name", "Type", "Currency", "Balance", "Active"], data)
    );
    Ok(())
}
