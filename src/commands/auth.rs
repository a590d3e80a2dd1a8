// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context as _, Result};

use super::Context;
use crate::api::{ApiClient, Credential};
use crate::db;

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("login", sub)) => {
            let token = sub.get_one::<String>("token").unwrap().trim().to_string();
            let client = ApiClient::new(
                &ctx.settings.base_url,
                Credential::new(token.clone()),
                ctx.settings.timeout_secs,
            )?;
            client
                .verify()
                .with_context(|| format!("Token check against {}", ctx.settings.base_url))?;
            db::cache_token(&ctx.conn, &token)?;
            println!("Token verified and cached");
        }
        Some(("logout", _)) => {
            db::clear_token(&ctx.conn)?;
            println!("Cached token removed");
        }
        Some(("status", _)) => {
            let source = if ctx.settings.api_key.is_some() {
                "config/env/flag"
            } else if db::cached_token(&ctx.conn)?.is_some() {
                "cached"
            } else {
                "none"
            };
            println!("API: {}", ctx.settings.base_url);
            println!("Token: {}", source);
            match db::synced_at(&ctx.conn)? {
                Some(at) => println!("Last sync: {}", at),
                None => println!("Last sync: never"),
            }
        }
        _ => {}
    }
    Ok(())
}
