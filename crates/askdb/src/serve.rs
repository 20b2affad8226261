// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `askdb serve` command implementation.
//!
//! Opens the SQLite store, builds the NLQ service client, and runs the
//! gateway HTTP server until the process exits.

use std::sync::Arc;
use std::time::Instant;

use askdb_config::AskdbConfig;
use askdb_core::AskdbError;
use askdb_gateway::{start_server, GatewayState, ServerConfig};
use askdb_nlq::NlqClient;
use askdb_storage::Database;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Runs the `askdb serve` command.
pub async fn run_serve(config: AskdbConfig) -> Result<(), AskdbError> {
    init_tracing(&config.log.level);

    info!("starting askdb serve");

    let db = Database::open_with(&config.storage.database_path, config.storage.wal_mode).await?;
    info!(path = %config.storage.database_path, "storage initialized");

    let nlq = NlqClient::new(&config.nlq)?;
    info!(base_url = %config.nlq.base_url, "NLQ service client ready");

    let state = GatewayState {
        db: Arc::new(db),
        nlq: Arc::new(nlq),
        start_time: Instant::now(),
    };
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    start_server(&server_config, state).await
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over the configured
/// level when set.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
