// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Casting Agency - Permission-Gated Movies & Actors API
//!
//! Every catalog route is guarded by a bearer token issued by an external
//! identity provider. Tokens are verified against the provider's JWKS and
//! must carry the route's permission (e.g. `post:movies`).
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Token verification and permission enforcement (JWKS JWT)
//! - `config` - Environment configuration
//! - `storage` - Embedded catalog database (redb)
//! - `telemetry` - Structured logging

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod telemetry;
