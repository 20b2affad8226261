// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving the gateway router: register a connection,
//! start a session, submit a question against a stubbed NLQ service, and
//! read the persisted history back.

use std::sync::Arc;
use std::time::Instant;

use askdb_config::model::NlqConfig;
use askdb_core::User;
use askdb_gateway::{router, GatewayState};
use askdb_nlq::NlqClient;
use askdb_storage::queries::users;
use askdb_storage::{now_utc, Database};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "tok-alice";

struct TestApp {
    router: Router,
    nlq_server: MockServer,
    _dir: tempfile::TempDir,
}

async fn spawn_app() -> TestApp {
    spawn_app_with(None).await
}

/// Build the app; `nlq_base_url` overrides where the NLQ client points
/// (the mock server by default).
async fn spawn_app_with(nlq_base_url: Option<String>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("api.db").to_str().unwrap())
        .await
        .unwrap();

    users::insert_user(
        &db,
        &User {
            id: "u-alice".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            profile_image: "/profile.png".to_string(),
            api_token: TOKEN.to_string(),
            created_at: now_utc(),
            updated_at: now_utc(),
        },
    )
    .await
    .unwrap();

    let nlq_server = MockServer::start().await;
    let nlq = NlqClient::new(&NlqConfig {
        base_url: nlq_base_url.unwrap_or_else(|| nlq_server.uri()),
        timeout_secs: 5,
    })
    .unwrap();

    let state = GatewayState {
        db: Arc::new(db),
        nlq: Arc::new(nlq),
        start_time: Instant::now(),
    };

    TestApp {
        router: router(state),
        nlq_server,
        _dir: dir,
    }
}

fn authed(method_str: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method_str)
        .uri(uri)
        .header("authorization", format!("Bearer {TOKEN}"));
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn chat_success_body() -> serde_json::Value {
    serde_json::json!({
        "user_query": "how many customers are there",
        "sql_query": "SELECT COUNT(*) FROM customers",
        "sql_result": [{"count": 42}],
        "summary": "There are 42 customers.",
        "agent_thought_process": "...",
        "title": "Customer count"
    })
}

async fn create_connection(app: &TestApp) -> String {
    let (status, body) = send(
        app,
        authed(
            "POST",
            "/v1/connections",
            Some(serde_json::json!({
                "host": "db.local",
                "username": "u",
                "password": "p",
                "database": "sales",
                "engine": "mysql"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["host"], "db.local");
    assert_eq!(body["database"], "sales");
    assert_eq!(body["engine"], "mysql");
    body["id"].as_str().unwrap().to_string()
}

async fn create_session(app: &TestApp, connection_id: &str) -> String {
    let (status, body) = send(
        app,
        authed(
            "POST",
            "/v1/sessions",
            Some(serde_json::json!({ "connection_id": connection_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Untitled Session");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let app = spawn_app().await;
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn v1_routes_require_a_valid_token() {
    let app = spawn_app().await;

    let bare = Request::builder()
        .method("GET")
        .uri("/v1/connections")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, bare).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let wrong = Request::builder()
        .method("GET")
        .uri("/v1/connections")
        .header("authorization", "Bearer tok-wrong")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn connection_create_validates_engine_type() {
    let app = spawn_app().await;
    let (status, body) = send(
        &app,
        authed(
            "POST",
            "/v1/connections",
            Some(serde_json::json!({
                "host": "db.local",
                "username": "u",
                "password": "p",
                "database": "sales",
                "engine": "oracle"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid database type");

    // Nothing was persisted.
    let (_, list) = send(&app, authed("GET", "/v1/connections", None)).await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn connection_crud_round_trips() {
    let app = spawn_app().await;
    let id = create_connection(&app).await;

    let (status, body) = send(&app, authed("GET", &format!("/v1/connections/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());

    let (status, body) = send(
        &app,
        authed(
            "PUT",
            &format!("/v1/connections/{id}"),
            Some(serde_json::json!({ "host": "db2.local", "engine": "postgresql" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["host"], "db2.local");
    assert_eq!(body["engine"], "postgresql");
    assert_eq!(body["username"], "u");

    let (status, _) = send(
        &app,
        authed("DELETE", &format!("/v1/connections/{id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, authed("GET", &format!("/v1/connections/{id}"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn question_round_trip_persists_message_and_renames_session() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_success_body()))
        .expect(1)
        .mount(&app.nlq_server)
        .await;

    let connection_id = create_connection(&app).await;
    let session_id = create_session(&app, &connection_id).await;

    // An empty history is an empty list, not an error.
    let (status, body) = send(
        &app,
        authed("GET", &format!("/v1/sessions/{session_id}/messages"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (status, message) = send(
        &app,
        authed(
            "POST",
            "/v1/messages",
            Some(serde_json::json!({
                "session_id": session_id,
                "connection_id": connection_id,
                "request_query": "how many customers are there"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(message["request_query"], "how many customers are there");
    assert_eq!(message["sql_query"], "SELECT COUNT(*) FROM customers");
    assert_eq!(message["sql_response"][0]["count"], 42);
    assert_eq!(message["summary"], "There are 42 customers.");
    assert!(message["execution_time_ms"].as_i64().unwrap() >= 0);

    // The session's title was rewritten from the service's suggestion.
    let (_, session) = send(&app, authed("GET", &format!("/v1/sessions/{session_id}"), None)).await;
    assert_eq!(session["title"], "Customer count");
    assert_eq!(session["owner"]["username"], "alice");
    assert_eq!(session["database"]["name"], "sales");

    // History lists the persisted message with the author expanded.
    let (_, history) = send(
        &app,
        authed("GET", &format!("/v1/sessions/{session_id}/messages"), None),
    )
    .await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["id"], message["id"]);
    assert_eq!(history[0]["author"]["username"], "alice");
}

#[tokio::test]
async fn service_rejection_surfaces_detail_and_persists_nothing() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user_query": "how many customers are there",
            "error": "This query doesn't appear to be related to the database. Please try again with a database-related question."
        })))
        .mount(&app.nlq_server)
        .await;

    let connection_id = create_connection(&app).await;
    let session_id = create_session(&app, &connection_id).await;

    let (status, body) = send(
        &app,
        authed(
            "POST",
            "/v1/messages",
            Some(serde_json::json!({
                "session_id": session_id,
                "connection_id": connection_id,
                "request_query": "how many customers are there"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("doesn't appear to be related"));

    let (_, history) = send(
        &app,
        authed("GET", &format!("/v1/sessions/{session_id}/messages"), None),
    )
    .await;
    assert_eq!(history.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unknown_connection_in_submission_is_not_found() {
    let app = spawn_app().await;
    // No /chat mock mounted: the service must never be called.

    let connection_id = create_connection(&app).await;
    let session_id = create_session(&app, &connection_id).await;

    let (status, body) = send(
        &app,
        authed(
            "POST",
            "/v1/messages",
            Some(serde_json::json!({
                "session_id": session_id,
                "connection_id": "c-missing",
                "request_query": "how many customers are there"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "database configuration not found");
}

#[tokio::test]
async fn unreachable_service_maps_to_service_unavailable() {
    // Nothing listens on the discard port.
    let app = spawn_app_with(Some("http://127.0.0.1:9".to_string())).await;
    let connection_id = create_connection(&app).await;
    let session_id = create_session(&app, &connection_id).await;

    let (status, _) = send(
        &app,
        authed(
            "POST",
            "/v1/messages",
            Some(serde_json::json!({
                "session_id": session_id,
                "connection_id": connection_id,
                "request_query": "how many customers are there"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn recommendations_proxy_the_service() {
    let app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/recommend"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "recommended_queries": ["How many customers are there?"]
        })))
        .mount(&app.nlq_server)
        .await;

    let connection_id = create_connection(&app).await;
    let (status, body) = send(
        &app,
        authed(
            "GET",
            &format!("/v1/connections/{connection_id}/recommendations"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["recommended_queries"][0],
        "How many customers are there?"
    );
}

#[tokio::test]
async fn repeated_reads_are_idempotent() {
    let app = spawn_app().await;
    let connection_id = create_connection(&app).await;
    create_session(&app, &connection_id).await;

    let (_, first) = send(&app, authed("GET", "/v1/sessions", None)).await;
    let (_, second) = send(&app, authed("GET", "/v1/sessions", None)).await;
    assert_eq!(first, second);

    let (_, first) = send(&app, authed("GET", "/v1/connections", None)).await;
    let (_, second) = send(&app, authed("GET", "/v1/connections", None)).await;
    assert_eq!(first, second);
}
