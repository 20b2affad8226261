// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the external natural-language-to-SQL service.
//!
//! The service is an opaque collaborator: it receives a question plus a
//! connection descriptor, runs the translation and the SQL itself, and
//! reports either a full result or a rejection. This crate owns the wire
//! types and the outcome classification; nothing downstream ever touches
//! the service's raw JSON.

pub mod client;
pub mod types;

pub use client::NlqClient;
pub use types::{
    ChatFailure, ChatOutcome, ChatRequest, ChatSuccess, DatabaseConfig, QueryRequest,
    RecommendRequest, RecommendResponse, SqlResult,
};
