// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context as _, Result, anyhow};
use serde::Serialize;
use tracing::info;

use super::{Context, range_arg};
use crate::aggregate::{Lookup, TransactionFilter, filter_transactions};
use crate::api::TransactionDraft;
use crate::db;
use crate::models::{Ledger, Mutation, Transaction, TransactionType};
use crate::utils::{all_or, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(ctx: &mut Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(ctx, sub)?,
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("edit", sub)) => edit(ctx, sub)?,
        Some(("rm", sub)) => remove(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let ledger = ctx.ledger(sub)?;
    let data = query_rows(&ledger, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.description.clone(),
                    r.kind.clone(),
                    r.category.clone(),
                    r.account.clone(),
                    r.amount.clone(),
                    r.tags.join(", "),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Description", "Type", "Category", "Account", "Amount", "Tags"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub description: String,
    pub kind: String,
    pub category: String,
    pub account: String,
    pub amount: String,
    pub tags: Vec<String>,
    pub notes: String,
}

pub fn filter_from_args(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    let kind = match all_or(sub.get_one::<String>("type")) {
        Some(k) => Some(k.parse::<TransactionType>()?),
        None => None,
    };
    Ok(TransactionFilter {
        search: sub.get_one::<String>("search").cloned(),
        kind,
        category: all_or(sub.get_one::<String>("category")),
        account: all_or(sub.get_one::<String>("account")),
        range: range_arg(sub)?,
    })
}

/// Filtered transactions, newest first.
pub fn query_rows(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let filter = filter_from_args(sub)?;
    let lookup = Lookup::new(ledger);
    let mut hits = filter_transactions(&ledger.transactions, &lookup, &filter);
    hits.sort_by(|a, b| b.date.cmp(&a.date));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        hits.truncate(*limit);
    }
    Ok(hits
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.to_string(),
            description: t.description.clone(),
            kind: t.kind.to_string(),
            category: lookup.category_name(&t.category_id).to_string(),
            account: lookup.account_name(&t.account_id).to_string(),
            amount: format!("{:.2}", t.amount),
            tags: t.tags.clone(),
            notes: t.notes.clone().unwrap_or_default(),
        })
        .collect())
}

pub fn id_for_category(ledger: &Ledger, name: &str) -> Result<String> {
    let name = name.trim();
    ledger
        .categories
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .map(|c| c.id.clone())
        .ok_or_else(|| anyhow!("Category '{}' not found", name))
}

pub fn id_for_account(ledger: &Ledger, name: &str) -> Result<String> {
    let name = name.trim();
    ledger
        .accounts
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(name))
        .map(|a| a.id.clone())
        .ok_or_else(|| anyhow!("Account '{}' not found", name))
}

/// Builds a draft from `base`, replacing whatever the arguments provide.
pub fn draft_from_args(
    ledger: &Ledger,
    sub: &clap::ArgMatches,
    base: Option<&Transaction>,
) -> Result<TransactionDraft> {
    let pick = |name: &str| sub.get_one::<String>(name).map(|s| s.trim().to_string());

    let date = match pick("date") {
        Some(d) => parse_date(&d)?,
        None => base.map(|t| t.date).context("--date is required")?,
    };
    let amount = match pick("amount") {
        Some(a) => parse_decimal(&a)?,
        None => base.map(|t| t.amount).context("--amount is required")?,
    };
    let kind = match pick("type") {
        Some(k) => k.parse::<TransactionType>()?,
        None => base.map(|t| t.kind).context("--type is required")?,
    };
    let category_id = match pick("category") {
        Some(c) => id_for_category(ledger, &c)?,
        None => base
            .map(|t| t.category_id.clone())
            .context("--category is required")?,
    };
    let account_id = match pick("account") {
        Some(a) => id_for_account(ledger, &a)?,
        None => base
            .map(|t| t.account_id.clone())
            .context("--account is required")?,
    };
    let description = match pick("description") {
        Some(d) => d,
        None => base
            .map(|t| t.description.clone())
            .context("--description is required")?,
    };
    let tags: Vec<String> = match sub.get_many::<String>("tag") {
        Some(v) => v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect(),
        None => base.map(|t| t.tags.clone()).unwrap_or_default(),
    };
    let notes = pick("note")
        .filter(|n| !n.is_empty())
        .or_else(|| base.and_then(|t| t.notes.clone()));

    Ok(TransactionDraft {
        description,
        amount,
        kind,
        category_id,
        account_id,
        date,
        tags,
        notes,
    })
}

/// Applies a confirmed write to the local snapshot, if one exists.
fn splice_snapshot(ctx: &mut Context, mutation: Mutation) -> Result<()> {
    if db::synced_at(&ctx.conn)?.is_none() {
        return Ok(());
    }
    let mut ledger = db::load_ledger(&ctx.conn)?;
    ledger.reconcile(mutation);
    db::store_ledger(&mut ctx.conn, &ledger)
}

fn add(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    let client = ctx.client()?;
    let (ledger, _) = client.fetch_ledger()?;
    let draft = draft_from_args(&ledger, sub, None)?;
    let created = client.create_transaction(&draft)?;
    info!(id = %created.id, "transaction created");
    println!(
        "Recorded {} {} on {} ({})",
        created.kind, created.amount, created.date, created.description
    );
    splice_snapshot(ctx, Mutation::Created(created))
}

fn edit(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().to_string();
    let client = ctx.client()?;
    let (ledger, _) = client.fetch_ledger()?;
    let current = ledger
        .transactions
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| anyhow!("Transaction '{}' not found", id))?;
    let draft = draft_from_args(&ledger, sub, Some(current))?;
    let updated = client.update_transaction(&id, &draft)?;
    info!(id = %updated.id, "transaction updated");
    println!("Updated transaction {}", updated.id);
    splice_snapshot(ctx, Mutation::Updated(updated))
}

fn remove(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().to_string();
    ctx.client()?.delete_transaction(&id)?;
    info!(id = %id, "transaction deleted");
    println!("Removed transaction {}", id);
    splice_snapshot(ctx, Mutation::Deleted(id))
}
