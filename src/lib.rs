// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Drinks Server - Drinks catalog API guarded by Auth0 bearer tokens
//!
//! Every request to a protected endpoint passes through the auth pipeline:
//! bearer extraction, JWKS-backed signature and claim verification, then an
//! RBAC permission check.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token verification and permission checks (Auth0 JWT)
//! - `config` - Environment-driven configuration
//! - `store` - In-memory drinks catalog

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
