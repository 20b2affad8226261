// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The query-message pipeline: the lifecycle of one natural-language
//! question from submission to persisted, renderable result.
//!
//! Sequencing:
//! 1. resolve the connection (no external call when it is missing)
//! 2. one synchronous call to the NLQ service
//! 3. persist exactly one immutable message on success
//! 4. best-effort session title rename when the service suggests one
//!
//! Any failure before step 3 leaves no trace; there is no retry at any
//! layer. Two concurrent submissions to the same session may race on the
//! title rename; last write wins, which is acceptable because messages
//! are independently addressable and immutable.

use std::time::Instant;

use askdb_core::{AskdbError, QueryMessage};
use askdb_nlq::types::{ChatRequest, QueryRequest};
use askdb_nlq::{NlqClient, SqlResult};
use askdb_storage::queries::{connections, messages, sessions};
use askdb_storage::{now_utc, Database};
use tracing::{debug, warn};

/// One question submission, as accepted by the message endpoint.
#[derive(Debug, Clone)]
pub struct QuestionSubmission {
    pub session_id: String,
    pub connection_id: String,
    pub request_query: String,
}

/// Run the pipeline for one submission on behalf of `author_id`.
///
/// Returns the persisted message; the recorded execution time covers
/// pipeline entry to persistence of the successful path only.
pub async fn run(
    db: &Database,
    nlq: &NlqClient,
    author_id: &str,
    submission: QuestionSubmission,
) -> Result<QueryMessage, AskdbError> {
    let started = Instant::now();

    let connection = connections::get_for_user(db, &submission.connection_id, author_id)
        .await?
        .ok_or_else(|| AskdbError::not_found("database configuration"))?;

    let chat = nlq
        .chat(&ChatRequest {
            query_request: QueryRequest {
                query: submission.request_query.clone(),
            },
            database_config: (&connection).into(),
        })
        .await?;

    let message = QueryMessage {
        id: uuid::Uuid::new_v4().to_string(),
        session_id: submission.session_id.clone(),
        user_id: author_id.to_string(),
        request_query: chat.user_query,
        sql_query: chat.sql_query,
        sql_response: chat.sql_result.and_then(SqlResult::into_rows),
        summary: chat.summary,
        thought_process: chat.agent_thought_process,
        execution_time_ms: started.elapsed().as_millis() as i64,
        created_at: now_utc(),
    };
    messages::insert_message(db, &message).await?;

    debug!(
        session_id = %message.session_id,
        execution_time_ms = message.execution_time_ms,
        "query message persisted"
    );

    // Best effort: the message stays persisted even if the rename fails.
    if let Some(title) = chat.title {
        if let Err(e) = sessions::rename_title(db, &submission.session_id, &title).await {
            warn!(
                session_id = %submission.session_id,
                error = %e,
                "failed to rename session title"
            );
        }
    }

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdb_config::model::NlqConfig;
    use askdb_core::{EngineType, QuerySession, User, DEFAULT_SESSION_TITLE};
    use askdb_storage::queries::users;
    use askdb_storage::ConnectionRecord;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db").to_str().unwrap())
            .await
            .unwrap();

        users::insert_user(
            &db,
            &User {
                id: "u1".to_string(),
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                profile_image: "/profile.png".to_string(),
                api_token: "tok-u1".to_string(),
                created_at: now_utc(),
                updated_at: now_utc(),
            },
        )
        .await
        .unwrap();

        connections::create_connection(
            &db,
            &ConnectionRecord {
                id: "c1".to_string(),
                user_id: "u1".to_string(),
                host: "db.local".to_string(),
                username: "u".to_string(),
                password: "p".to_string(),
                database: "sales".to_string(),
                engine: EngineType::Mysql,
                created_at: now_utc(),
                updated_at: now_utc(),
            },
        )
        .await
        .unwrap();

        sessions::create_session(
            &db,
            &QuerySession {
                id: "s1".to_string(),
                user_id: "u1".to_string(),
                connection_id: "c1".to_string(),
                title: DEFAULT_SESSION_TITLE.to_string(),
                description: None,
                created_at: now_utc(),
                updated_at: now_utc(),
            },
        )
        .await
        .unwrap();

        (db, dir)
    }

    fn client_for(server_uri: &str) -> NlqClient {
        NlqClient::new(&NlqConfig {
            base_url: server_uri.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn submission() -> QuestionSubmission {
        QuestionSubmission {
            session_id: "s1".to_string(),
            connection_id: "c1".to_string(),
            request_query: "how many customers are there".to_string(),
        }
    }

    fn success_body() -> serde_json::Value {
        serde_json::json!({
            "user_query": "how many customers are there",
            "sql_query": "SELECT COUNT(*) FROM customers",
            "sql_result": [{"count": 42}],
            "summary": "There are 42 customers.",
            "agent_thought_process": "...",
            "title": "Customer count"
        })
    }

    #[tokio::test]
    async fn success_persists_exactly_one_message_and_renames_session() {
        let (db, _dir) = setup_db().await;
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .expect(1)
            .mount(&server)
            .await;

        let request_started = Instant::now();
        let message = run(&db, &client_for(&server.uri()), "u1", submission())
            .await
            .unwrap();
        let wall_clock_ms = request_started.elapsed().as_millis() as i64;

        assert_eq!(message.request_query, "how many customers are there");
        assert_eq!(message.sql_query.as_deref(), Some("SELECT COUNT(*) FROM customers"));
        let rows = message.sql_response.as_ref().unwrap();
        assert_eq!(rows[0]["count"], 42);
        assert!(message.execution_time_ms >= 0);
        assert!(message.execution_time_ms <= wall_clock_ms);

        // Exactly one message, and the listing equals the returned record.
        let views = messages::list_views_for_session(&db, "s1").await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, message.id);
        assert_eq!(views[0].sql_response, message.sql_response);

        // The session picked up the suggested title.
        let session = sessions::get_view_for_user(&db, "s1", "u1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.title, "Customer count");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_connection_fails_without_calling_the_service() {
        let (db, _dir) = setup_db().await;
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .expect(0)
            .mount(&server)
            .await;

        let mut sub = submission();
        sub.connection_id = "c-missing".to_string();
        let err = run(&db, &client_for(&server.uri()), "u1", sub)
            .await
            .unwrap_err();

        assert!(matches!(err, AskdbError::NotFound { .. }), "got {err:?}");
        assert_eq!(messages::count_for_session(&db, "s1").await.unwrap(), 0);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn connection_of_another_user_is_not_found() {
        let (db, _dir) = setup_db().await;
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .expect(0)
            .mount(&server)
            .await;

        let err = run(&db, &client_for(&server.uri()), "u2", submission())
            .await
            .unwrap_err();
        assert!(matches!(err, AskdbError::NotFound { .. }), "got {err:?}");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn service_rejection_persists_nothing() {
        let (db, _dir) = setup_db().await;
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user_query": "how many customers are there",
                "error": "SQL execution failed: table customers does not exist"
            })))
            .mount(&server)
            .await;

        let err = run(&db, &client_for(&server.uri()), "u1", submission())
            .await
            .unwrap_err();

        match err {
            AskdbError::Rejected { detail } => assert!(detail.contains("SQL execution failed")),
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert_eq!(messages::count_for_session(&db, "s1").await.unwrap(), 0);

        // The default title survives a failed exchange.
        let session = sessions::get_view_for_user(&db, "s1", "u1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.title, DEFAULT_SESSION_TITLE);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_service_persists_nothing() {
        let (db, _dir) = setup_db().await;

        let err = run(&db, &client_for("http://127.0.0.1:9"), "u1", submission())
            .await
            .unwrap_err();

        assert!(matches!(err, AskdbError::Unavailable { .. }), "got {err:?}");
        assert_eq!(messages::count_for_session(&db, "s1").await.unwrap(), 0);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn missing_title_leaves_session_untouched() {
        let (db, _dir) = setup_db().await;
        let server = MockServer::start().await;
        let mut body = success_body();
        body.as_object_mut().unwrap().remove("title");
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        run(&db, &client_for(&server.uri()), "u1", submission())
            .await
            .unwrap();

        let session = sessions::get_view_for_user(&db, "s1", "u1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.title, DEFAULT_SESSION_TITLE);

        db.close().await.unwrap();
    }
}
