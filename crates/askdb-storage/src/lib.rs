// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the askdb query backend.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and typed CRUD operations for
//! users, database connections, query sessions, and query messages.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::{now_utc, Database};
pub use models::*;
