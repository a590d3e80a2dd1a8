// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use serde_json::json;
use std::path::Path;

use super::Context;
use crate::aggregate::Lookup;
use crate::models::Ledger;

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
            let out = sub.get_one::<String>("out").unwrap().trim().to_string();
            let ledger = ctx.ledger(sub)?;
            export_transactions(&ledger, &fmt, Path::new(&out))?;
            println!("Exported transactions to {}", out);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Writes every transaction, oldest first, with category and account names resolved.
pub fn export_transactions(ledger: &Ledger, fmt: &str, out: &Path) -> Result<()> {
    let lookup = Lookup::new(ledger);
    let mut txs: Vec<_> = ledger.transactions.iter().collect();
    txs.sort_by(|a, b| a.date.cmp(&b.date));

    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "date",
                "description",
                "type",
                "amount",
                "category",
                "account",
                "tags",
                "notes",
            ])?;
            for t in txs {
                wtr.write_record([
                    t.id.clone(),
                    t.date.to_string(),
                    t.description.clone(),
                    t.kind.to_string(),
                    t.amount.to_string(),
                    lookup.category_name(&t.category_id).to_string(),
                    lookup.account_name(&t.account_id).to_string(),
                    t.tags.join(";"),
                    t.notes.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = txs
                .into_iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "date": t.date.to_string(),
                        "description": t.description,
                        "type": t.kind.as_str(),
                        "amount": t.amount.to_string(),
                        "category": lookup.category_name(&t.category_id),
                        "account": lookup.account_name(&t.account_id),
                        "tags": t.tags,
                        "notes": t.notes,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(())
}
