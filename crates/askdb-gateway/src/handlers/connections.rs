// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection registry endpoints.
//!
//! Every operation is scoped to the authenticated caller; a record owned by
//! someone else is reported as not found. No connectivity probe happens on
//! create or update — bad credentials surface later, when the NLQ service
//! tries to use them.

use std::str::FromStr;

use askdb_core::{AskdbError, ConnectionRecord, ConnectionUpdate, EngineType};
use askdb_nlq::types::RecommendRequest;
use askdb_storage::queries::connections;
use askdb_storage::now_utc;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::server::GatewayState;

/// Request body for POST /v1/connections.
#[derive(Debug, Deserialize)]
pub struct CreateConnectionRequest {
    pub host: String,
    pub username: String,
    pub password: String,
    pub database: String,
    /// Engine kind; validated against the recognized set here so the
    /// caller gets a validation error, not a deserialization one.
    pub engine: String,
}

/// Request body for PUT /v1/connections/{id}. Absent fields are left alone.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateConnectionRequest {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub engine: Option<String>,
}

/// Response body for GET /v1/connections/{id}/recommendations.
#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommended_queries: Vec<String>,
}

fn parse_engine(raw: &str) -> Result<EngineType, AskdbError> {
    EngineType::from_str(raw).map_err(|_| AskdbError::validation("Invalid database type"))
}

/// POST /v1/connections
pub async fn create_connection(
    State(state): State<GatewayState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateConnectionRequest>,
) -> Result<(StatusCode, Json<ConnectionRecord>), ApiError> {
    let engine = parse_engine(&body.engine)?;

    let now = now_utc();
    let record = ConnectionRecord {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.id,
        host: body.host,
        username: body.username,
        password: body.password,
        database: body.database,
        engine,
        created_at: now.clone(),
        updated_at: now,
    };
    connections::create_connection(&state.db, &record).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /v1/connections
pub async fn list_connections(
    State(state): State<GatewayState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ConnectionRecord>>, ApiError> {
    let records = connections::list_for_user(&state.db, &user.id).await?;
    Ok(Json(records))
}

/// GET /v1/connections/{id}
pub async fn get_connection(
    State(state): State<GatewayState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ConnectionRecord>, ApiError> {
    let record = connections::get_for_user(&state.db, &id, &user.id)
        .await?
        .ok_or_else(|| AskdbError::not_found("database connection"))?;
    Ok(Json(record))
}

/// PUT /v1/connections/{id}
pub async fn update_connection(
    State(state): State<GatewayState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateConnectionRequest>,
) -> Result<Json<ConnectionRecord>, ApiError> {
    let engine = body.engine.as_deref().map(parse_engine).transpose()?;

    let update = ConnectionUpdate {
        host: body.host,
        username: body.username,
        password: body.password,
        database: body.database,
        engine,
    };
    let record = connections::update_for_user(&state.db, &id, &user.id, update, &now_utc())
        .await?
        .ok_or_else(|| AskdbError::not_found("database connection"))?;
    Ok(Json(record))
}

/// DELETE /v1/connections/{id}
///
/// Sessions referencing the connection are left in place (no cascade).
pub async fn delete_connection(
    State(state): State<GatewayState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = connections::delete_for_user(&state.db, &id, &user.id).await?;
    if !deleted {
        return Err(AskdbError::not_found("database connection").into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/connections/{id}/recommendations
///
/// Proxies the NLQ service's question suggestions for this connection.
pub async fn get_recommendations(
    State(state): State<GatewayState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let record = connections::get_for_user(&state.db, &id, &user.id)
        .await?
        .ok_or_else(|| AskdbError::not_found("database connection"))?;

    let recommended_queries = state
        .nlq
        .recommend(&RecommendRequest {
            database_config: (&record).into(),
        })
        .await?;
    Ok(Json(RecommendationsResponse {
        recommended_queries,
    }))
}
