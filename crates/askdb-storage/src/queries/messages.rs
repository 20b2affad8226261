// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query-message operations.
//!
//! Messages are write-once: there is no update or delete path. Tabular
//! results are stored as a JSON TEXT column and decoded on read.

use askdb_core::types::ResultRow;
use askdb_core::AskdbError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{MessageAuthor, MessageView, QueryMessage};

fn decode_rows(
    index: usize,
    raw: Option<String>,
) -> Result<Option<Vec<ResultRow>>, rusqlite::Error> {
    raw.map(|text| {
        serde_json::from_str(&text).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                index,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
    })
    .transpose()
}

/// Insert a new message. Messages are immutable once persisted.
pub async fn insert_message(db: &Database, msg: &QueryMessage) -> Result<(), AskdbError> {
    let sql_response = msg
        .sql_response
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| AskdbError::Storage {
            source: Box::new(e),
        })?;
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (id, session_id, user_id, request_query, sql_query,
                                       sql_response, summary, thought_process, execution_time_ms, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    msg.id,
                    msg.session_id,
                    msg.user_id,
                    msg.request_query,
                    msg.sql_query,
                    sql_response,
                    msg.summary,
                    msg.thought_process,
                    msg.execution_time_ms,
                    msg.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all messages for a session, newest first, with the author's
/// username expanded. A session with no history yields an empty list.
pub async fn list_views_for_session(
    db: &Database,
    session_id: &str,
) -> Result<Vec<MessageView>, AskdbError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.session_id, m.request_query, m.sql_query, m.sql_response,
                        m.summary, m.thought_process, m.execution_time_ms, m.created_at,
                        u.id, u.username
                 FROM messages m
                 JOIN users u ON u.id = m.user_id
                 WHERE m.session_id = ?1
                 ORDER BY m.created_at DESC, m.rowid DESC",
            )?;
            let rows = stmt.query_map(params![session_id], |row| {
                let raw_response: Option<String> = row.get(4)?;
                Ok(MessageView {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    request_query: row.get(2)?,
                    sql_query: row.get(3)?,
                    sql_response: decode_rows(4, raw_response)?,
                    summary: row.get(5)?,
                    thought_process: row.get(6)?,
                    execution_time_ms: row.get(7)?,
                    created_at: row.get(8)?,
                    author: MessageAuthor {
                        id: row.get(9)?,
                        username: row.get(10)?,
                    },
                })
            })?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count messages in a session.
pub async fn count_for_session(db: &Database, session_id: &str) -> Result<i64, AskdbError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM messages WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
