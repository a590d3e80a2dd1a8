// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use finboard::commands::{self, Context};
use finboard::{cli, config, db};

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("finboard={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let overrides = config::Overrides {
        base_url: matches.get_one::<String>("base-url").cloned(),
        api_key: matches.get_one::<String>("api-key").cloned(),
    };
    let path = matches.get_one::<String>("config").map(PathBuf::from);
    let settings = config::load(path.as_deref(), overrides).context("Loading configuration")?;
    init_tracing(&settings.log_level);

    let conn = db::open_or_init()?;
    let mut ctx = Context::new(settings, conn);

    match matches.subcommand() {
        Some(("sync", sub)) => commands::sync::handle(&mut ctx, sub)?,
        Some(("overview", sub)) => commands::overview::handle(&ctx, sub)?,
        Some(("trend", sub)) => commands::reports::handle_trend(&ctx, sub)?,
        Some(("breakdown", sub)) => commands::reports::handle_breakdown(&ctx, sub)?,
        Some(("top", sub)) => commands::reports::handle_top(&ctx, sub)?,
        Some(("budgets", sub)) => commands::budgets::handle(&ctx, sub)?,
        Some(("runway", sub)) => commands::overview::handle_runway(&ctx, sub)?,
        Some(("accounts", sub)) => commands::accounts::handle(&ctx, sub)?,
        Some(("categories", sub)) => commands::categories::handle(&ctx, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut ctx, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ctx, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&ctx, sub)?,
        Some(("auth", sub)) => commands::auth::handle(&ctx, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
