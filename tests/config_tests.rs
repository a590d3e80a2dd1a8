// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finboard::config::{self, Overrides, Settings};
use std::fs;
use tempfile::tempdir;

#[test]
fn file_values_layer_over_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("finboard.toml");
    fs::write(
        &path,
        "base_url = \"https://ledger.example.org\"\ntrend_months = 12\napi_key = \"  \"\n",
    )
    .unwrap();

    let s = config::load(Some(&path), Overrides::default()).unwrap();
    assert_eq!(s.base_url, "https://ledger.example.org");
    assert_eq!(s.trend_months, 12);
    assert_eq!(s.top_n, Settings::default().top_n);
    assert_eq!(s.currency, "USD");
    // blank keys count as unset
    assert_eq!(s.api_key, None);
}

#[test]
fn command_line_overrides_win() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("finboard.toml");
    fs::write(&path, "base_url = \"https://file.example.org\"\napi_key = \"from-file\"\n").unwrap();

    let s = config::load(
        Some(&path),
        Overrides {
            base_url: Some("http://localhost:4000".into()),
            api_key: Some(" dev-token ".into()),
        },
    )
    .unwrap();
    assert_eq!(s.base_url, "http://localhost:4000");
    assert_eq!(s.api_key.as_deref(), Some("dev-token"));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(config::load(Some(&path), Overrides::default()).is_err());
}
