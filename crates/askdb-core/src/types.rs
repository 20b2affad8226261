// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain record types shared across the askdb workspace.
//!
//! All identifiers are opaque strings (UUIDs in practice) and all timestamps
//! are ISO-8601 strings, matching what the storage layer persists.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Title given to a session when the caller does not supply one. The message
/// pipeline overwrites it once the NLQ service suggests a better title.
pub const DEFAULT_SESSION_TITLE: &str = "Untitled Session";

/// One row of a tabular SQL result: column name to JSON value.
pub type ResultRow = serde_json::Map<String, serde_json::Value>;

/// The relational database kind a connection record targets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EngineType {
    Mysql,
    Postgresql,
}

/// A registered user. Identity resolution itself (cookie/token issuance) is
/// handled by the auth collaborator; the backend only reads these rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub profile_image: String,
    /// Bearer token presented by the client on every request.
    pub api_token: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Stored credentials and engine type for one external relational database,
/// owned by exactly one user. The password is persisted as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub id: String,
    pub user_id: String,
    pub host: String,
    pub username: String,
    pub password: String,
    pub database: String,
    pub engine: EngineType,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial update for a connection record. Only present fields are merged;
/// absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionUpdate {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub engine: Option<EngineType>,
}

/// A titled sequence of question/answer exchanges against one connection.
/// Owner and connection references are fixed for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySession {
    pub id: String,
    pub user_id: String,
    pub connection_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A session with owner and connection display fields expanded, as returned
/// by the session listing and detail reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub owner: SessionOwner,
    pub database: SessionDatabase,
    pub created_at: String,
    pub updated_at: String,
}

/// Display fields of a session's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOwner {
    pub id: String,
    pub username: String,
    pub email: String,
    pub profile_image: String,
}

/// Display fields of a session's database connection. The name may reference
/// a deleted connection; sessions are never cascaded on connection delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDatabase {
    pub id: String,
    pub name: Option<String>,
}

/// One immutable question/answer exchange within a session.
///
/// The optional fields each carry a distinct meaning: `sql_query` absent means
/// no SQL was produced; `sql_response` absent means the statement returned no
/// rows; `summary`/`thought_process` absent mean the service omitted them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMessage {
    pub id: String,
    pub session_id: String,
    pub user_id: String,
    pub request_query: String,
    pub sql_query: Option<String>,
    pub sql_response: Option<Vec<ResultRow>>,
    pub summary: Option<String>,
    pub thought_process: Option<String>,
    pub execution_time_ms: i64,
    pub created_at: String,
}

/// A message with its author's username expanded, newest-first in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageView {
    pub id: String,
    pub session_id: String,
    pub author: MessageAuthor,
    pub request_query: String,
    pub sql_query: Option<String>,
    pub sql_response: Option<Vec<ResultRow>>,
    pub summary: Option<String>,
    pub thought_process: Option<String>,
    pub execution_time_ms: i64,
    pub created_at: String,
}

/// Display fields of a message's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAuthor {
    pub id: String,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn engine_type_round_trips_through_display() {
        for engine in [EngineType::Mysql, EngineType::Postgresql] {
            let s = engine.to_string();
            let parsed = EngineType::from_str(&s).expect("should parse back");
            assert_eq!(engine, parsed);
        }
    }

    #[test]
    fn engine_type_rejects_unknown_values() {
        assert!(EngineType::from_str("oracle").is_err());
        assert!(EngineType::from_str("MySQL ").is_err());
    }

    #[test]
    fn engine_type_serializes_lowercase() {
        let json = serde_json::to_string(&EngineType::Postgresql).unwrap();
        assert_eq!(json, "\"postgresql\"");
        let parsed: EngineType = serde_json::from_str("\"mysql\"").unwrap();
        assert_eq!(parsed, EngineType::Mysql);
    }

    #[test]
    fn connection_update_defaults_to_no_changes() {
        let update = ConnectionUpdate::default();
        assert!(update.host.is_none());
        assert!(update.engine.is_none());
    }

    #[test]
    fn query_message_optional_fields_serialize_as_null() {
        let msg = QueryMessage {
            id: "m1".into(),
            session_id: "s1".into(),
            user_id: "u1".into(),
            request_query: "how many customers".into(),
            sql_query: None,
            sql_response: None,
            summary: None,
            thought_process: None,
            execution_time_ms: 12,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json["sql_query"].is_null());
        assert!(json["sql_response"].is_null());
        assert_eq!(json["execution_time_ms"], 12);
    }
}
