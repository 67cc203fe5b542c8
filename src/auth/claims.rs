// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the verified claim set handed to protected handlers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// `aud` may be a single string or an array of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Audience {
    One(String),
    Many(Vec<String>),
}

impl From<Audience> for Vec<String> {
    fn from(value: Audience) -> Self {
        match value {
            Audience::One(aud) => vec![aud],
            Audience::Many(auds) => auds,
        }
    }
}

/// Wire representation of the token payload.
///
/// Only the fields the service reads are declared; unknown claims
/// (`azp`, `scope`, `iat`, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenClaims {
    pub sub: String,
    pub iss: String,
    pub aud: Audience,
    pub exp: i64,
    /// `None` when the claim is absent, distinct from an explicit `[]`
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

/// Payload fields read before signature verification.
///
/// Used only to reject expired tokens early; never to accept one.
#[derive(Debug, Deserialize)]
pub(crate) struct UnverifiedExpiry {
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Claims of a successfully verified token.
///
/// Created fresh per request and moved into request extensions for the
/// protected handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedClaims {
    /// Token issuer (`iss`)
    pub issuer: String,
    /// Token audiences (`aud`)
    pub audience: Vec<String>,
    /// Caller identity (`sub`)
    pub subject: String,
    /// Expiry (`exp`, Unix seconds)
    pub expires_at: i64,
    /// Granted permissions; `None` if the token carried no `permissions` claim
    pub permissions: Option<BTreeSet<String>>,
}

impl From<TokenClaims> for DecodedClaims {
    fn from(claims: TokenClaims) -> Self {
        Self {
            issuer: claims.iss,
            audience: claims.aud.into(),
            subject: claims.sub,
            expires_at: claims.exp,
            permissions: claims
                .permissions
                .map(|granted| granted.into_iter().collect()),
        }
    }
}
