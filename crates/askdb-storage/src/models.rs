// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `askdb-core::types` for use across
//! crate boundaries. This module re-exports them for convenience within
//! the storage crate.

pub use askdb_core::types::{
    ConnectionRecord, ConnectionUpdate, MessageAuthor, MessageView, QueryMessage, QuerySession,
    SessionDatabase, SessionOwner, SessionView, User,
};
