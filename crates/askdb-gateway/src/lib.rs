// SPDX-FileCopyrightText: 2026 Askdb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the askdb backend.
//!
//! Hosts the REST surface (connection registry, session store, message
//! endpoints) behind bearer-token auth, and the query-message pipeline
//! that turns a submitted question into a persisted result via the
//! external NLQ service.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod server;

pub use server::{router, start_server, GatewayState, ServerConfig};
