// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication middleware for the gateway.
//!
//! Resolves a bearer token (`Authorization: Bearer <token>`) to a user row
//! and attaches the identity to the request. Requests without a resolvable
//! identity are rejected before any handler logic runs (fail-closed).

use askdb_core::AskdbError;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::server::GatewayState;

/// The authenticated caller, attached to every `/v1` request as an extension.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub profile_image: String,
}

/// Middleware that resolves the bearer token to a user identity.
pub async fn auth_middleware(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AskdbError::Unauthorized)?;

    let user = askdb_storage::queries::users::get_by_api_token(&state.db, token)
        .await?
        .ok_or(AskdbError::Unauthorized)?;

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        username: user.username,
        email: user.email,
        profile_image: user.profile_image,
    });

    Ok(next.run(request).await)
}
