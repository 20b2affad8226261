// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User row operations.
//!
//! Account creation and credential issuance belong to the auth collaborator;
//! the backend only inserts rows on its behalf and resolves bearer tokens.

use askdb_core::AskdbError;
use rusqlite::params;

use crate::database::Database;
use crate::models::User;

fn user_from_row(row: &rusqlite::Row<'_>) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        profile_image: row.get(3)?,
        api_token: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Insert a new user row.
pub async fn insert_user(db: &Database, user: &User) -> Result<(), AskdbError> {
    let user = user.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, profile_image, api_token, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    user.id,
                    user.username,
                    user.email,
                    user.profile_image,
                    user.api_token,
                    user.created_at,
                    user.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Resolve a bearer token to its user, if any.
pub async fn get_by_api_token(db: &Database, token: &str) -> Result<Option<User>, AskdbError> {
    let token = token.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, email, profile_image, api_token, created_at, updated_at
                 FROM users WHERE api_token = ?1",
            )?;
            let result = stmt.query_row(params![token], user_from_row);
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_user(id: &str, token: &str) -> User {
        User {
            id: id.to_string(),
            username: format!("user-{id}"),
            email: format!("{id}@example.com"),
            profile_image: "/profile.png".to_string(),
            api_token: token.to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_resolve_by_token() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();

        insert_user(&db, &make_user("u1", "tok-1")).await.unwrap();

        let resolved = get_by_api_token(&db, "tok-1").await.unwrap();
        assert_eq!(resolved.unwrap().id, "u1");

        let missing = get_by_api_token(&db, "tok-unknown").await.unwrap();
        assert!(missing.is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();

        let first = make_user("u1", "tok-1");
        let mut second = make_user("u2", "tok-2");
        second.username = first.username.clone();

        insert_user(&db, &first).await.unwrap();
        let result = insert_user(&db, &second).await;
        assert!(result.is_err(), "UNIQUE constraint should reject duplicate");

        db.close().await.unwrap();
    }
}
