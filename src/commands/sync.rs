// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context as _, Result};
use serde::Serialize;
use tracing::info;

use super::Context;
use crate::db;
use crate::utils::{maybe_print_json, pretty_table};

#[derive(Debug, Serialize)]
pub struct SyncSummary {
    pub accounts: usize,
    pub categories: usize,
    pub transactions: usize,
    pub budgets: usize,
    pub skipped: usize,
}

pub fn handle(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    let client = ctx.client()?;
    let (ledger, report) = client
        .fetch_ledger()
        .with_context(|| format!("Fetching ledger from {}", ctx.settings.base_url))?;
    db::store_ledger(&mut ctx.conn, &ledger)?;

    let summary = SyncSummary {
        accounts: ledger.accounts.len(),
        categories: ledger.categories.len(),
        transactions: ledger.transactions.len(),
        budgets: ledger.budgets.len(),
        skipped: report.skipped.len(),
    };
    info!(?summary, "sync complete");

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        let rows = vec![
            vec!["accounts".into(), summary.accounts.to_string()],
            vec!["categories".into(), summary.categories.to_string()],
            vec!["transactions".into(), summary.transactions.to_string()],
            vec!["budgets".into(), summary.budgets.to_string()],
            vec!["skipped".into(), summary.skipped.to_string()],
        ];
        println!("{}", pretty_table(&["Collection", "Records"], rows));
        if !report.is_clean() {
            let rows = report
                .skipped
                .iter()
                .map(|s| vec![s.collection.to_string(), s.id.clone(), s.reason.clone()])
                .collect();
            println!("{}", pretty_table(&["Collection", "Id", "Reason"], rows));
        }
    }
    Ok(())
}
