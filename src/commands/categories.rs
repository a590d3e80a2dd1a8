// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::Context;
use crate::utils::{maybe_print_json, normalize_color, pretty_table};

pub fn handle(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ctx.ledger(sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &ledger.categories)? {
        return Ok(());
    }
    let mut cats: Vec<_> = ledger.categories.iter().collect();
    cats.sort_by(|a, b| (a.kind.as_str(), &a.name).cmp(&(b.kind.as_str(), &b.name)));
    let data = cats
        .into_iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.kind.to_string(),
                normalize_color(c.color.as_deref()).to_string(),
                c.icon.clone().unwrap_or_default(),
                if c.is_active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Type", "Color", "Icon", "Active"], data)
    );
    Ok(())
}
