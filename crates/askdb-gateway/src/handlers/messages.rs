// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query-message endpoints: question submission and session history.

use askdb_core::{MessageView, QueryMessage};
use askdb_storage::queries::messages;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::pipeline::{self, QuestionSubmission};
use crate::server::GatewayState;

/// Request body for POST /v1/messages.
#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub session_id: String,
    pub connection_id: String,
    /// The user's literal question text.
    pub request_query: String,
}

/// POST /v1/messages
///
/// Runs the full question pipeline and returns the persisted message.
pub async fn create_message(
    State(state): State<GatewayState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<QueryMessage>), ApiError> {
    let message = pipeline::run(
        &state.db,
        &state.nlq,
        &user.id,
        QuestionSubmission {
            session_id: body.session_id,
            connection_id: body.connection_id,
            request_query: body.request_query,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /v1/sessions/{id}/messages
///
/// Full history, newest first. A session with no history yet yields an
/// empty list rather than an error, so clients can render an empty state.
pub async fn list_session_messages(
    State(state): State<GatewayState>,
    Extension(_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MessageView>>, ApiError> {
    let views = messages::list_views_for_session(&state.db, &id).await?;
    Ok(Json(views))
}
