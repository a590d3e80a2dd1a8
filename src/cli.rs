// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Print JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .global(true)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn range_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("from").long("from").help("Start date YYYY-MM-DD (inclusive)"))
        .arg(Arg::new("to").long("to").help("End date YYYY-MM-DD (inclusive)"))
}

fn as_of() -> Arg {
    Arg::new("as-of")
        .long("as-of")
        .help("Reference date YYYY-MM-DD (default: today)")
}

fn tx_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("date").long("date").required(required))
        .arg(Arg::new("amount").long("amount").required(required))
        .arg(
            Arg::new("type")
                .long("type")
                .required(required)
                .value_parser(["income", "expense", "transfer"]),
        )
        .arg(
            Arg::new("category")
                .long("category")
                .required(required)
                .help("Category name"),
        )
        .arg(
            Arg::new("account")
                .long("account")
                .required(required)
                .help("Account name"),
        )
        .arg(Arg::new("description").long("description").required(required))
        .arg(Arg::new("note").long("note"))
        .arg(
            Arg::new("tag")
                .long("tag")
                .action(ArgAction::Append)
                .help("Tag (repeatable)"),
        )
}

pub fn build_cli() -> Command {
    let cmd = Command::new("finboard")
        .version(clap::crate_version!())
        .about("Ledger reports, budgets and runway for the finance dashboard API")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Config file (TOML)"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .help("Finance API base URL"),
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .global(true)
                .help("Developer token (overrides config and cached token)"),
        )
        .arg(
            Arg::new("offline")
                .long("offline")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Read the last synced snapshot instead of the API"),
        );

    json_flags(cmd)
        .subcommand(Command::new("sync").about("Fetch the ledger and store a local snapshot"))
        .subcommand(range_args(
            Command::new("overview")
                .about("Balance, period totals and runway")
                .arg(as_of()),
        ))
        .subcommand(
            Command::new("trend")
                .about("Monthly income and expense")
                .arg(
                    Arg::new("months")
                        .long("months")
                        .value_parser(value_parser!(usize)),
                )
                .arg(as_of()),
        )
        .subcommand(range_args(
            Command::new("breakdown")
                .about("Totals by category")
                .arg(
                    Arg::new("direction")
                        .long("direction")
                        .value_parser(["income", "expense"])
                        .default_value("expense"),
                ),
        ))
        .subcommand(Command::new("budgets").about("Budget spent, remaining and status"))
        .subcommand(Command::new("runway").about("Months of balance at the average expense"))
        .subcommand(
            Command::new("top").about("Largest transactions").arg(
                Arg::new("limit")
                    .long("limit")
                    .value_parser(value_parser!(usize)),
            ),
        )
        .subcommand(Command::new("accounts").about("Accounts and balances"))
        .subcommand(Command::new("categories").about("Income and expense categories"))
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(range_args(
                    Command::new("list")
                        .arg(Arg::new("search").long("search"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["all", "income", "expense", "transfer"]),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("account").long("account"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(tx_fields(Command::new("add"), true))
                .subcommand(tx_fields(
                    Command::new("edit").arg(Arg::new("id").long("id").required(true)),
                    false,
                ))
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true))),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .value_parser(["csv", "json"])
                            .default_value("csv"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Check the ledger for dangling references"))
        .subcommand(
            Command::new("auth")
                .about("Developer token")
                .subcommand(
                    Command::new("login").arg(Arg::new("token").long("token").required(true)),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("status")),
        )
}
