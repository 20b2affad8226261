// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes: the [`Database`]
//! struct IS the single writer, query modules accept `&Database` and call
//! through `connection().call()`.

use askdb_core::AskdbError;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::migrations;

/// Handle to the SQLite database.
///
/// Wraps a single `tokio_rusqlite::Connection`; all closure calls are
/// serialized on one background thread, which eliminates SQLITE_BUSY errors
/// under concurrent request handling.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path` with WAL mode enabled,
    /// applying any pending migrations.
    pub async fn open(path: &str) -> Result<Self, AskdbError> {
        Self::open_with(path, true).await
    }

    /// Open (or create) the database at `path`, applying any pending
    /// migrations. `wal_mode` controls the journal mode PRAGMA.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, AskdbError> {
        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| AskdbError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| AskdbError::Storage { source: Box::new(e) })?;

        conn.call(move |conn| {
            let journal_mode = if wal_mode { "WAL" } else { "DELETE" };
            conn.pragma_update(None, "journal_mode", journal_mode)?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| migrations::run_migrations(conn))
            .await
            .map_err(|e| AskdbError::Storage { source: Box::new(e) })?;

        debug!(path, "sqlite database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying tokio-rusqlite connection handle.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the background connection.
    pub async fn close(&self) -> Result<(), AskdbError> {
        self.conn
            .call(|conn| {
                // wal_checkpoint returns a result row, so it cannot go
                // through execute_batch.
                conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.clone().close().await.map_err(map_tr_err)?;
        debug!("sqlite database closed");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the crate-wide storage error.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> AskdbError {
    AskdbError::Storage {
        source: Box::new(e),
    }
}

/// Current UTC time formatted the way every timestamp column stores it.
///
/// Millisecond precision with a literal `Z` suffix keeps lexicographic and
/// chronological ordering identical, which the newest-first message listing
/// relies on.
pub fn now_utc() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
