// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query-session CRUD operations.
//!
//! Reads return [`SessionView`] with owner and connection display fields
//! expanded. The connection side of the join is LEFT: deleting a connection
//! orphans its sessions, and an orphaned session still lists with its
//! database name absent.

use askdb_core::AskdbError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{QuerySession, SessionDatabase, SessionOwner, SessionView};

const VIEW_SELECT: &str = "SELECT s.id, s.title, s.description, s.created_at, s.updated_at,
        u.id, u.username, u.email, u.profile_image,
        s.connection_id, c.db_name
 FROM sessions s
 JOIN users u ON u.id = s.user_id
 LEFT JOIN connections c ON c.id = s.connection_id";

fn view_from_row(row: &rusqlite::Row<'_>) -> Result<SessionView, rusqlite::Error> {
    Ok(SessionView {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
        owner: SessionOwner {
            id: row.get(5)?,
            username: row.get(6)?,
            email: row.get(7)?,
            profile_image: row.get(8)?,
        },
        database: SessionDatabase {
            id: row.get(9)?,
            name: row.get(10)?,
        },
    })
}

/// Create a new session. The referenced connection is not checked for
/// existence; a dangling reference is the caller's responsibility.
pub async fn create_session(db: &Database, session: &QuerySession) -> Result<(), AskdbError> {
    let session = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (id, user_id, connection_id, title, description, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    session.id,
                    session.user_id,
                    session.connection_id,
                    session.title,
                    session.description,
                    session.created_at,
                    session.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all sessions owned by the given user, newest first.
pub async fn list_views_for_user(
    db: &Database,
    user_id: &str,
) -> Result<Vec<SessionView>, AskdbError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{VIEW_SELECT} WHERE s.user_id = ?1 ORDER BY s.created_at DESC"
            ))?;
            let rows = stmt.query_map(params![user_id], view_from_row)?;
            let mut sessions = Vec::new();
            for row in rows {
                sessions.push(row?);
            }
            Ok(sessions)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a session by id, scoped to its owner.
pub async fn get_view_for_user(
    db: &Database,
    id: &str,
    user_id: &str,
) -> Result<Option<SessionView>, AskdbError> {
    let id = id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("{VIEW_SELECT} WHERE s.id = ?1 AND s.user_id = ?2"))?;
            let result = stmt.query_row(params![id, user_id], view_from_row);
            match result {
                Ok(view) => Ok(Some(view)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Overwrite a session's title and bump its updated_at timestamp.
///
/// Invoked by the message pipeline after a successful exchange; last write
/// wins, no conflict detection.
pub async fn rename_title(db: &Database, id: &str, title: &str) -> Result<(), AskdbError> {
    let id = id.to_string();
    let title = title.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE sessions SET title = ?1, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2",
                params![title, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
