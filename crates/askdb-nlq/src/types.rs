// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! NLQ service request/response types.
//!
//! The service's response shapes are decoded into a tagged union right at
//! this boundary; free-form JSON never crosses into the domain.

use askdb_core::types::{ConnectionRecord, ResultRow};
use serde::{Deserialize, Serialize};

/// The natural-language question part of a chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The user's literal question text.
    pub query: String,
}

/// Connection descriptor forwarded to the NLQ service so it can reach the
/// user's database directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Engine kind: "mysql" or "postgresql".
    pub dbtype: String,
    pub host: String,
    pub user: String,
    pub password: String,
    /// Name of the database to query.
    pub dbname: String,
}

impl From<&ConnectionRecord> for DatabaseConfig {
    fn from(record: &ConnectionRecord) -> Self {
        Self {
            dbtype: record.engine.to_string(),
            host: record.host.clone(),
            user: record.username.clone(),
            password: record.password.clone(),
            dbname: record.database.clone(),
        }
    }
}

/// Request body for the service's `/chat` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query_request: QueryRequest,
    pub database_config: DatabaseConfig,
}

/// Request body for the service's `/recommend` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub database_config: DatabaseConfig,
}

/// Success payload for `/recommend`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendResponse {
    pub recommended_queries: Vec<String>,
}

/// The tabular part of a chat success payload.
///
/// The service sends either an array of uniform row objects or a plain
/// notice string when the statement returned no rows.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SqlResult {
    Rows(Vec<ResultRow>),
    Notice(String),
}

impl SqlResult {
    /// Rows when present; a notice collapses to `None` ("no rows returned",
    /// as opposed to "no SQL produced", which is the absence of the field).
    pub fn into_rows(self) -> Option<Vec<ResultRow>> {
        match self {
            SqlResult::Rows(rows) => Some(rows),
            SqlResult::Notice(_) => None,
        }
    }
}

/// A successful chat exchange as reported by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSuccess {
    /// The question as the service normalized it.
    pub user_query: String,
    /// Generated SQL; absent when the service could not produce one.
    #[serde(default)]
    pub sql_query: Option<String>,
    /// Tabular result; absent when no SQL was executed.
    #[serde(default)]
    pub sql_result: Option<SqlResult>,
    /// Natural-language summary of the result.
    #[serde(default)]
    pub summary: Option<String>,
    /// Free-text reasoning trace of the agent.
    #[serde(default)]
    pub agent_thought_process: Option<String>,
    /// Suggested session title, when the service offers one.
    #[serde(default)]
    pub title: Option<String>,
}

/// A semantic error reported inside an HTTP 2xx response, e.g. a question
/// the service judged unrelated to the database.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatFailure {
    #[serde(default)]
    pub user_query: Option<String>,
    pub error: String,
    #[serde(default)]
    pub details: Option<String>,
}

/// Decoded outcome of a 2xx `/chat` response.
///
/// Failure is listed first so any payload carrying an `error` field is
/// classified as a failure before the permissive success shape can match.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChatOutcome {
    Failure(ChatFailure),
    Success(ChatSuccess),
}

/// Error body the service attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    pub detail: String,
}
