// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query-session endpoints.
//!
//! Reads are scoped to the authenticated owner, including the by-id read.
//! Creation performs no existence check against the referenced connection;
//! a dangling reference is the caller's responsibility.

use askdb_core::{AskdbError, QuerySession, SessionView, DEFAULT_SESSION_TITLE};
use askdb_storage::now_utc;
use askdb_storage::queries::sessions;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::server::GatewayState;

/// Request body for POST /v1/sessions.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub connection_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /v1/sessions
pub async fn create_session(
    State(state): State<GatewayState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<QuerySession>), ApiError> {
    let now = now_utc();
    let session = QuerySession {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.id,
        connection_id: body.connection_id,
        title: body
            .title
            .unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string()),
        description: body.description,
        created_at: now.clone(),
        updated_at: now,
    };
    sessions::create_session(&state.db, &session).await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /v1/sessions
pub async fn list_sessions(
    State(state): State<GatewayState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<SessionView>>, ApiError> {
    let views = sessions::list_views_for_user(&state.db, &user.id).await?;
    Ok(Json(views))
}

/// GET /v1/sessions/{id}
pub async fn get_session(
    State(state): State<GatewayState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let view = sessions::get_view_for_user(&state.db, &id, &user.id)
        .await?
        .ok_or_else(|| AskdbError::not_found("query session"))?;
    Ok(Json(view))
}
