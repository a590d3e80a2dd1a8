// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::aggregate::{DEFAULT_TOP_N, DEFAULT_TREND_MONTHS};

pub const ENV_PREFIX: &str = "FINBOARD";

/// Runtime settings: defaults, then the TOML file, then `FINBOARD_*`
/// environment variables, then command-line overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    /// Developer token; falls back to the one cached by `auth login`.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub trend_months: usize,
    pub top_n: usize,
    pub currency: String,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            api_key: None,
            timeout_secs: 15,
            trend_months: DEFAULT_TREND_MONTHS,
            top_n: DEFAULT_TOP_N,
            currency: "USD".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

pub fn default_path() -> Option<PathBuf> {
    crate::db::project_dirs().map(|p| p.config_dir().join("finboard.toml"))
}

pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();
    match path {
        Some(p) => builder = builder.add_source(File::from(p).required(true)),
        None => {
            if let Some(p) = default_path() {
                builder = builder.add_source(File::from(p).required(false));
            }
        }
    }
    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(url) = overrides.base_url {
        settings.base_url = url;
    }
    if let Some(key) = overrides.api_key {
        settings.api_key = Some(key);
    }
    settings.api_key = settings
        .api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());
    Ok(settings)
}
