// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification.
//!
//! Steps, in order, stopping at the first failure:
//!
//! 1. `Authorization` header present
//! 2. Header is exactly `Bearer <token>`
//! 3. Token header decodes and names a `kid`
//! 4. `kid` resolves to a signing key (see [`JwksManager`])
//! 5. Algorithm, expiry, signature, issuer and audience check out
//!
//! Expiry is checked before the signature so an expired token is always
//! reported as [`AuthError::TokenExpired`].

use axum::http::HeaderValue;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use super::claims::{TokenClaims, UnverifiedExpiry};
use super::{AuthError, DecodedClaims, JwksManager};
use crate::config::AuthSettings;

/// Validates bearer tokens against the identity provider's keys.
#[derive(Clone)]
pub struct TokenVerifier {
    jwks: JwksManager,
    issuer: String,
    audience: String,
    algorithm: Algorithm,
    leeway: u64,
}

impl TokenVerifier {
    /// Build a verifier (and its key resolver) from settings.
    pub fn new(settings: &AuthSettings) -> Result<Self, AuthError> {
        Ok(Self::with_jwks(JwksManager::new(settings)?, settings))
    }

    /// Build a verifier around an existing key resolver.
    pub fn with_jwks(jwks: JwksManager, settings: &AuthSettings) -> Self {
        Self {
            jwks,
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            algorithm: settings.algorithm,
            leeway: settings.leeway,
        }
    }

    pub fn jwks(&self) -> &JwksManager {
        &self.jwks
    }

    /// Verify the raw `Authorization` header value of a request.
    pub async fn verify(&self, header: Option<&HeaderValue>) -> Result<DecodedClaims, AuthError> {
        let header = header.ok_or(AuthError::MissingAuthHeader)?;
        let token = bearer_token(header)?;
        self.verify_token(token).await
    }

    /// Verify a bare token (header already stripped).
    pub async fn verify_token(&self, token: &str) -> Result<DecodedClaims, AuthError> {
        // Decode header to get kid
        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "Failed to decode token header");
            AuthError::MalformedToken
        })?;
        let kid = header.kid.as_deref().ok_or(AuthError::MalformedToken)?;

        let signing_key = self.jwks.resolve(kid).await?;

        if header.alg != self.algorithm || signing_key.algorithm != self.algorithm {
            tracing::debug!(
                token_alg = ?header.alg,
                key_alg = ?signing_key.algorithm,
                expected = ?self.algorithm,
                "Token algorithm mismatch"
            );
            return Err(AuthError::ClaimsInvalid);
        }

        self.reject_expired(token)?;

        let mut validation = Validation::new(self.algorithm);
        validation.leeway = self.leeway;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        let token_data = decode::<TokenClaims>(token, &signing_key.key, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token validation failed");
                map_decode_error(e.kind())
            })?;

        Ok(token_data.claims.into())
    }

    /// Early expiry check on the unverified payload.
    fn reject_expired(&self, token: &str) -> Result<(), AuthError> {
        let unverified = jsonwebtoken::dangerous::insecure_decode::<UnverifiedExpiry>(token)
            .map_err(|_| AuthError::MalformedToken)?;
        let exp = unverified.claims.exp.ok_or(AuthError::ClaimsInvalid)?;

        let now = chrono::Utc::now().timestamp();
        if exp.saturating_add(self.leeway as i64) <= now {
            return Err(AuthError::TokenExpired);
        }
        Ok(())
    }
}

/// Split `Bearer <token>` into its token part.
///
/// Exactly two space-separated parts, the scheme matched case-sensitively.
pub fn bearer_token(header: &HeaderValue) -> Result<&str, AuthError> {
    let value = header.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;

    let mut parts = value.split(' ');
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AuthError::InvalidAuthHeader);
    };

    if scheme != "Bearer" || token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok(token)
}

fn map_decode_error(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::ImmatureSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::InvalidSubject => AuthError::ClaimsInvalid,
        _ => AuthError::MalformedToken,
    }
}
