// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./askdb.toml` > `~/.config/askdb/askdb.toml` > `/etc/askdb/askdb.toml`
//! with environment variable overrides via `ASKDB_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::AskdbConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/askdb/askdb.toml` (system-wide)
/// 3. `~/.config/askdb/askdb.toml` (user XDG config)
/// 4. `./askdb.toml` (local directory)
/// 5. `ASKDB_*` environment variables
pub fn load_config() -> Result<AskdbConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a specific TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<AskdbConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AskdbConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AskdbConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AskdbConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(AskdbConfig::default()))
        .merge(Toml::file("/etc/askdb/askdb.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("askdb/askdb.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("askdb.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `ASKDB_STORAGE_DATABASE_PATH` must map to
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("ASKDB_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("nlq_", "nlq.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}
