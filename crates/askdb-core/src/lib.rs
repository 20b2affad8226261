// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the askdb query backend.
//!
//! Provides the error taxonomy and domain record types shared by the
//! storage, NLQ-client, and gateway crates.

pub mod error;
pub mod types;

pub use error::AskdbError;
pub use types::{
    ConnectionRecord, ConnectionUpdate, EngineType, MessageAuthor, MessageView, QueryMessage,
    QuerySession, ResultRow, SessionDatabase, SessionOwner, SessionView, User,
    DEFAULT_SESSION_TITLE,
};
