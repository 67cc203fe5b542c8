// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorization Module
//!
//! This module verifies identity-provider issued JWTs and enforces
//! per-route permissions for the Casting Agency API.
//!
//! ## Auth Flow
//!
//! 1. Client authenticates with the identity provider (Auth0-style tenant)
//! 2. Client sends `Authorization: Bearer <JWT>`
//! 3. Server:
//!    - Resolves the token's `kid` against the cached JWKS (HTTPS)
//!    - Verifies signature, algorithm, expiry, issuer, audience
//!    - Checks the route's required permission against the `permissions` claim
//!    - Runs the handler with the verified [`DecodedClaims`]
//!
//! ## Security
//!
//! - Every catalog route requires a permission; only health and docs are public
//! - Any failure short-circuits with an [`AuthError`]; nothing defaults to allow
//! - Tokens are expired once `exp` is reached; clock skew tolerance is opt-in

pub mod claims;
pub mod error;
pub mod jwks;
pub mod middleware;
pub mod permissions;
pub mod verifier;

pub use claims::DecodedClaims;
pub use error::AuthError;
pub use jwks::{JwksManager, KeySet, SigningKey};
pub use middleware::{require_permission, RequirePermission};
pub use permissions::{authorize, Permission};
pub use verifier::TokenVerifier;
