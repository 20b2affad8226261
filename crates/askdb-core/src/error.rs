// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the askdb backend.

use thiserror::Error;

/// The primary error type used across all askdb crates.
///
/// Variants map one-to-one onto the HTTP statuses the gateway returns;
/// the mapping itself lives at the gateway boundary, not here.
#[derive(Debug, Error)]
pub enum AskdbError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Malformed or out-of-range input, e.g. an unrecognized engine type.
    #[error("{message}")]
    Validation { message: String },

    /// Referenced record absent or not owned by the caller. The two cases are
    /// deliberately indistinguishable so existence is never leaked to non-owners.
    #[error("{what} not found")]
    NotFound { what: String },

    /// Missing or invalid caller identity.
    #[error("missing or invalid credentials")]
    Unauthorized,

    /// The NLQ service could not be reached, or failed at the transport level.
    #[error("query service unavailable: {message}")]
    Unavailable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The NLQ service was reached but could not satisfy the question.
    /// Carries the service's own detail text.
    #[error("{detail}")]
    Rejected { detail: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AskdbError {
    /// Shorthand for a [`AskdbError::NotFound`] over a named resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        AskdbError::NotFound { what: what.into() }
    }

    /// Shorthand for a [`AskdbError::Validation`] with a message.
    pub fn validation(message: impl Into<String>) -> Self {
        AskdbError::Validation {
            message: message.into(),
        }
    }
}
