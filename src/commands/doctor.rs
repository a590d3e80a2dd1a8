// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use super::Context;
use crate::aggregate::Lookup;
use crate::models::{CategoryType, Ledger, TransactionType};
use crate::utils::{maybe_print_json, pretty_table};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

fn issue(kind: &'static str, detail: String) -> Issue {
    Issue { kind, detail }
}

/// Reference and consistency problems the reports silently tolerate.
pub fn diagnose(ledger: &Ledger) -> Vec<Issue> {
    let lookup = Lookup::new(ledger);
    let mut out = Vec::new();

    for t in &ledger.transactions {
        let label = format!("{} {} '{}'", t.id, t.date, t.description);
        match lookup.category(&t.category_id) {
            None => out.push(issue("txn_unknown_category", label.clone())),
            Some(c) => {
                let mismatch = matches!(
                    (t.kind, c.kind),
                    (TransactionType::Income, CategoryType::Expense)
                        | (TransactionType::Expense, CategoryType::Income)
                );
                if mismatch {
                    out.push(issue(
                        "txn_category_type_mismatch",
                        format!("{} ({} in {} category '{}')", label, t.kind, c.kind, c.name),
                    ));
                }
            }
        }
        if lookup.account(&t.account_id).is_none() {
            out.push(issue("txn_unknown_account", label));
        }
    }

    for b in &ledger.budgets {
        match lookup.category(&b.category_id) {
            None => out.push(issue(
                "budget_unknown_category",
                format!("{} (category id '{}')", b.id, b.category_id),
            )),
            Some(c) if c.kind == CategoryType::Income => out.push(issue(
                "budget_income_category",
                format!("{} on '{}'", b.id, c.name),
            )),
            Some(_) => {}
        }
        if b.end_date.is_some_and(|end| end < b.start_date) {
            out.push(issue(
                "budget_window_inverted",
                format!("{} ({} > {:?})", b.id, b.start_date, b.end_date),
            ));
        }
    }

    for a in ledger.accounts.iter().filter(|a| !a.is_active && !a.balance.is_zero()) {
        out.push(issue(
            "inactive_account_balance",
            format!("'{}' holds {:.2} and still counts toward runway", a.name, a.balance),
        ));
    }

    out
}

pub fn handle(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ctx.ledger(sub)?;
    let issues = diagnose(&ledger);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &issues)? {
        return Ok(());
    }
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|i| vec![i.kind.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
