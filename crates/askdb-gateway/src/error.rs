// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error-to-HTTP conversion at the request boundary.
//!
//! Every failure is caught here and converted to a JSON error body with a
//! status reflecting the error taxonomy; nothing is retried or queued.

use askdb_core::AskdbError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error description.
    pub error: String,
}

/// Wrapper that turns an [`AskdbError`] into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AskdbError);

impl From<AskdbError> for ApiError {
    fn from(err: AskdbError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AskdbError::Validation { .. } | AskdbError::Rejected { .. } => StatusCode::BAD_REQUEST,
            AskdbError::Unauthorized => StatusCode::UNAUTHORIZED,
            AskdbError::NotFound { .. } => StatusCode::NOT_FOUND,
            AskdbError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AskdbError::Config(_) | AskdbError::Storage { .. } | AskdbError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
