// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the askdb backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level askdb configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AskdbConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// External NLQ service settings.
    #[serde(default)]
    pub nlq: NlqConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("askdb").join("askdb.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("askdb.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// External NLQ service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NlqConfig {
    /// Base URL of the NLQ service, e.g. `https://studysyncs.xyz/services`.
    #[serde(default = "default_nlq_base_url")]
    pub base_url: String,

    /// Request timeout in seconds. There is no application-level retry;
    /// a hung service blocks only the single request that hit it.
    #[serde(default = "default_nlq_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NlqConfig {
    fn default() -> Self {
        Self {
            base_url: default_nlq_base_url(),
            timeout_secs: default_nlq_timeout_secs(),
        }
    }
}

fn default_nlq_base_url() -> String {
    "http://127.0.0.1:1111".to_string()
}

fn default_nlq_timeout_secs() -> u64 {
    120
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
