// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ErrorBody;

/// Classified failure of the authorization core.
///
/// Every variant maps to a fixed status, code and description. Internal
/// detail carried by [`AuthError::KeyFetchFailed`] is for logs only and is
/// never rendered into the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Header is not exactly `Bearer <token>`
    InvalidAuthHeader,
    /// Token cannot be parsed or carries no key identifier
    MalformedToken,
    /// No key in the JWKS matches the token's `kid`, even after a refresh
    InvalidKeyId,
    /// JWKS could not be fetched or parsed; treated as "cannot verify"
    KeyFetchFailed(String),
    /// Token has expired
    TokenExpired,
    /// Issuer, audience, algorithm or other claim mismatch
    ClaimsInvalid,
    /// Token signature is invalid
    InvalidSignature,
    /// Valid token without a `permissions` claim
    PermissionsClaimMissing,
    /// Required permission not held
    PermissionDenied,
}

impl AuthError {
    /// Machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "authorization_header_missing",
            AuthError::InvalidAuthHeader => "invalid_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidKeyId => "invalid_key_id",
            AuthError::KeyFetchFailed(_) => "key_fetch_failed",
            AuthError::TokenExpired => "token_expired",
            AuthError::ClaimsInvalid => "invalid_claims",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::PermissionsClaimMissing => "permissions_missing",
            AuthError::PermissionDenied => "unauthorized",
        }
    }

    /// HTTP status code for this error.
    ///
    /// Key fetch failures fail closed with 401 rather than surfacing a 5xx.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::MalformedToken
            | AuthError::InvalidKeyId
            | AuthError::KeyFetchFailed(_)
            | AuthError::TokenExpired
            | AuthError::ClaimsInvalid
            | AuthError::InvalidSignature => StatusCode::UNAUTHORIZED,
            AuthError::PermissionsClaimMissing => StatusCode::BAD_REQUEST,
            AuthError::PermissionDenied => StatusCode::FORBIDDEN,
        }
    }

    /// Short, user-facing description.
    pub fn description(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "Authorization header is expected.",
            AuthError::InvalidAuthHeader => {
                "Authorization header must be of the form 'Bearer <token>'."
            }
            AuthError::MalformedToken => "Unable to parse authentication token.",
            AuthError::InvalidKeyId => "Unable to find the appropriate key.",
            AuthError::KeyFetchFailed(_) => "Unable to verify token at this time.",
            AuthError::TokenExpired => "Token expired.",
            AuthError::ClaimsInvalid => "Incorrect claims. Please check the audience and issuer.",
            AuthError::InvalidSignature => "Token signature is invalid.",
            AuthError::PermissionsClaimMissing => "Permissions not included in JWT.",
            AuthError::PermissionDenied => "Permission not found.",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::KeyFetchFailed(detail) => {
                write!(f, "{} ({detail})", self.description())
            }
            other => f.write_str(other.description()),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ErrorBody::new(self.status_code(), self.error_code(), self.description()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_auth_returns_401() {
        let response = AuthError::MissingAuthHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 401);
        assert_eq!(body["code"], "authorization_header_missing");
    }

    #[tokio::test]
    async fn permission_denied_returns_403() {
        let response = AuthError::PermissionDenied.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], 403);
        assert_eq!(body["message"], "Permission not found.");
    }

    #[test]
    fn permissions_claim_missing_is_400() {
        assert_eq!(
            AuthError::PermissionsClaimMissing.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn key_fetch_failure_fails_closed_without_leaking_detail() {
        let err = AuthError::KeyFetchFailed("connection refused at 10.0.0.7:443".to_string());
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert!(err.to_string().contains("connection refused"));

        let response = err.into_response();
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert!(!body.contains("connection refused"));
        assert!(body.contains("key_fetch_failed"));
    }
}
