// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection registry CRUD operations.
//!
//! Every read and mutation is filtered by the owning user id. A lookup that
//! misses because the record belongs to someone else is indistinguishable
//! from one that misses because the record does not exist.

use std::str::FromStr;

use askdb_core::types::EngineType;
use askdb_core::AskdbError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{ConnectionRecord, ConnectionUpdate};

const CONNECTION_COLUMNS: &str =
    "id, user_id, host, username, password, db_name, engine, created_at, updated_at";

fn connection_from_row(row: &rusqlite::Row<'_>) -> Result<ConnectionRecord, rusqlite::Error> {
    let engine_str: String = row.get(6)?;
    let engine = EngineType::from_str(&engine_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(ConnectionRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        host: row.get(2)?,
        username: row.get(3)?,
        password: row.get(4)?,
        database: row.get(5)?,
        engine,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// Create a new connection record.
pub async fn create_connection(db: &Database, record: &ConnectionRecord) -> Result<(), AskdbError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO connections (id, user_id, host, username, password, db_name, engine, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.id,
                    record.user_id,
                    record.host,
                    record.username,
                    record.password,
                    record.database,
                    record.engine.to_string(),
                    record.created_at,
                    record.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all connections owned by the given user.
pub async fn list_for_user(db: &Database, user_id: &str) -> Result<Vec<ConnectionRecord>, AskdbError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONNECTION_COLUMNS} FROM connections WHERE user_id = ?1 ORDER BY created_at"
            ))?;
            let rows = stmt.query_map(params![user_id], connection_from_row)?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a connection by id, scoped to its owner.
pub async fn get_for_user(
    db: &Database,
    id: &str,
    user_id: &str,
) -> Result<Option<ConnectionRecord>, AskdbError> {
    let id = id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONNECTION_COLUMNS} FROM connections WHERE id = ?1 AND user_id = ?2"
            ))?;
            let result = stmt.query_row(params![id, user_id], connection_from_row);
            match result {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Merge the present fields of `update` into a connection, scoped to its
/// owner. Returns the updated record, or `None` when the record is absent
/// or owned by someone else (no mutation occurs in either case).
pub async fn update_for_user(
    db: &Database,
    id: &str,
    user_id: &str,
    update: ConnectionUpdate,
    updated_at: &str,
) -> Result<Option<ConnectionRecord>, AskdbError> {
    let id = id.to_string();
    let user_id = user_id.to_string();
    let updated_at = updated_at.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "UPDATE connections SET
                     host = COALESCE(?1, host),
                     username = COALESCE(?2, username),
                     password = COALESCE(?3, password),
                     db_name = COALESCE(?4, db_name),
                     engine = COALESCE(?5, engine),
                     updated_at = ?6
                 WHERE id = ?7 AND user_id = ?8",
                params![
                    update.host,
                    update.username,
                    update.password,
                    update.database,
                    update.engine.map(|e| e.to_string()),
                    updated_at,
                    id,
                    user_id,
                ],
            )?;
            if affected == 0 {
                return Ok(None);
            }
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONNECTION_COLUMNS} FROM connections WHERE id = ?1"
            ))?;
            let record = stmt.query_row(params![id], connection_from_row)?;
            Ok(Some(record))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a connection, scoped to its owner. Returns whether a row was
/// removed. Sessions referencing the connection are deliberately left alone.
pub async fn delete_for_user(db: &Database, id: &str, user_id: &str) -> Result<bool, AskdbError> {
    let id = id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "DELETE FROM connections WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )?;
            Ok(affected > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
