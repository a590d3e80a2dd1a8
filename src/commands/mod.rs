// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod auth;
pub mod budgets;
pub mod categories;
pub mod doctor;
pub mod exporter;
pub mod overview;
pub mod reports;
pub mod sync;
pub mod transactions;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::warn;

use crate::aggregate::DateRange;
use crate::api::{ApiClient, Credential, LedgerSource};
use crate::config::Settings;
use crate::db::{self, SnapshotStore};
use crate::models::Ledger;
use crate::utils::{parse_date, today};

/// What every command handler needs: resolved settings and the local store.
pub struct Context {
    pub settings: Settings,
    pub conn: Connection,
}

impl Context {
    pub fn new(settings: Settings, conn: Connection) -> Self {
        Self { settings, conn }
    }

    /// Token from config/env/flags first, then the one cached by `auth login`.
    pub fn credential(&self) -> Result<Credential> {
        if let Some(key) = &self.settings.api_key {
            return Ok(Credential::new(key.clone()));
        }
        match db::cached_token(&self.conn)? {
            Some(t) => Ok(Credential::new(t)),
            None => bail!(
                "No developer token; pass --api-key, set FINBOARD_API_KEY or run `finboard auth login`"
            ),
        }
    }

    pub fn client(&self) -> Result<ApiClient> {
        Ok(ApiClient::new(
            &self.settings.base_url,
            self.credential()?,
            self.settings.timeout_secs,
        )?)
    }

    /// Loads the ledger from the API, or from the snapshot with `--offline`.
    pub fn ledger(&self, m: &clap::ArgMatches) -> Result<Ledger> {
        let (ledger, report) = if m.get_flag("offline") {
            SnapshotStore::new(&self.conn).load_ledger()?
        } else {
            self.client()?.load_ledger()?
        };
        if !report.is_clean() {
            warn!(skipped = report.skipped.len(), "some records were skipped");
        }
        Ok(ledger)
    }
}

pub fn date_arg(m: &clap::ArgMatches, name: &str) -> Result<Option<NaiveDate>> {
    m.get_one::<String>(name).map(|s| parse_date(s)).transpose()
}

pub fn range_arg(m: &clap::ArgMatches) -> Result<DateRange> {
    let range = DateRange::new(date_arg(m, "from")?, date_arg(m, "to")?);
    if let (Some(f), Some(t)) = (range.from, range.to) {
        if f > t {
            bail!("--from {} is after --to {}", f, t);
        }
    }
    Ok(range)
}

pub fn as_of_arg(m: &clap::ArgMatches) -> Result<NaiveDate> {
    Ok(date_arg(m, "as-of")?.unwrap_or_else(today))
}
