// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

// Kept in its own test binary: it mutates FINBOARD_* process variables.

use finboard::config::{self, Overrides};
use std::fs;
use tempfile::tempdir;

#[test]
fn environment_overrides_file_and_flags_override_environment() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("finboard.toml");
    fs::write(
        &path,
        "base_url = \"https://file.example.org\"\napi_key = \"from-file\"\ntimeout_secs = 5\ncurrency = \"EUR\"\n",
    )
    .unwrap();

    // SAFETY: the only test in this binary, so no other thread reads the environment.
    unsafe {
        std::env::set_var("FINBOARD_BASE_URL", "https://env.example.org");
        std::env::set_var("FINBOARD_API_KEY", "from-env");
        std::env::set_var("FINBOARD_TIMEOUT_SECS", "42");
    }

    let s = config::load(Some(&path), Overrides::default()).unwrap();
    assert_eq!(s.base_url, "https://env.example.org");
    assert_eq!(s.api_key.as_deref(), Some("from-env"));
    assert_eq!(s.timeout_secs, 42);
    // untouched by the environment
    assert_eq!(s.currency, "EUR");

    let s = config::load(
        Some(&path),
        Overrides {
            base_url: None,
            api_key: Some("from-flag".into()),
        },
    )
    .unwrap();
    assert_eq!(s.base_url, "https://env.example.org");
    assert_eq!(s.api_key.as_deref(), Some("from-flag"));

    unsafe {
        std::env::remove_var("FINBOARD_BASE_URL");
        std::env::remove_var("FINBOARD_API_KEY");
        std::env::remove_var("FINBOARD_TIMEOUT_SECS");
    }
}
