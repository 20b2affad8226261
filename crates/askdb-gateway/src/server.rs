// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use askdb_core::AskdbError;
use askdb_nlq::NlqClient;
use askdb_storage::Database;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::auth_middleware;
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Single-writer SQLite handle.
    pub db: Arc<Database>,
    /// Client for the external NLQ service.
    pub nlq: Arc<NlqClient>,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

/// Gateway server configuration (mirrors `ServerConfig` from askdb-config,
/// kept separate to avoid a config-crate dependency here).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router.
///
/// `/health` is public; everything under `/v1` passes the bearer-token
/// middleware first.
pub fn router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route(
            "/v1/connections",
            post(handlers::connections::create_connection).get(handlers::connections::list_connections),
        )
        .route(
            "/v1/connections/{id}",
            get(handlers::connections::get_connection)
                .put(handlers::connections::update_connection)
                .delete(handlers::connections::delete_connection),
        )
        .route(
            "/v1/connections/{id}/recommendations",
            get(handlers::connections::get_recommendations),
        )
        .route(
            "/v1/sessions",
            post(handlers::sessions::create_session).get(handlers::sessions::list_sessions),
        )
        .route("/v1/sessions/{id}", get(handlers::sessions::get_session))
        .route(
            "/v1/sessions/{id}/messages",
            get(handlers::messages::list_session_messages),
        )
        .route("/v1/messages", post(handlers::messages::create_message))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the gateway HTTP server and serve until the process exits.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), AskdbError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AskdbError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| AskdbError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
