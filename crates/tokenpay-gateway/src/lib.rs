// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Tokenpay.
//!
//! Exposes the package catalog, read-only receipt checks, purchases and
//! per-user settings over a small JSON API. User identity is asserted by an
//! upstream that shares the gateway's bearer token.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::{AuthConfig, AuthenticatedUser};
pub use error::ApiError;
pub use server::{GatewayState, ServerConfig, router, start_server};
