// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-route authorization middleware for Axum.
//!
//! Each protected route is registered with the permission it requires:
//!
//! ```rust,ignore
//! let guard = RequirePermission::new(verifier.clone(), POST_MOVIES);
//!
//! let movies = post(create_movie)
//!     .route_layer(axum::middleware::from_fn_with_state(guard, require_permission));
//! ```
//!
//! The wrapped handler only runs once the token is authentic **and** holds
//! the permission. It receives the verified claims through
//! `Extension<DecodedClaims>`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::permissions::{authorize, Permission};
use super::{AuthError, TokenVerifier};

/// Routing-time declaration of a required permission.
#[derive(Clone)]
pub struct RequirePermission {
    verifier: Arc<TokenVerifier>,
    permission: Permission,
}

impl RequirePermission {
    pub fn new(verifier: Arc<TokenVerifier>, permission: Permission) -> Self {
        Self {
            verifier,
            permission,
        }
    }
}

/// Authentication then authorization, in that order.
///
/// An unauthenticated caller always gets the authentication error, even if
/// the permission would also be missing.
pub async fn require_permission(
    State(guard): State<RequirePermission>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request.headers().get(AUTHORIZATION).cloned();
    let outcome = async {
        let claims = guard.verifier.verify(header.as_ref()).await?;
        authorize(&claims, &guard.permission)?;
        Ok::<_, AuthError>(claims)
    }
    .await;

    match outcome {
        Ok(claims) => {
            tracing::debug!(
                subject = %claims.subject,
                permission = %guard.permission,
                "Request authorized"
            );
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err @ AuthError::KeyFetchFailed(_)) => {
            tracing::warn!(
                code = err.error_code(),
                error = %err,
                path = %request.uri().path(),
                "Signing keys unavailable, request rejected"
            );
            err.into_response()
        }
        Err(err) => {
            tracing::debug!(
                code = err.error_code(),
                permission = %guard.permission,
                path = %request.uri().path(),
                "Request rejected"
            );
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::permissions::GET_MOVIES;
    use crate::config::AuthSettings;
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    fn guard() -> RequirePermission {
        let settings = AuthSettings::new("https://iss/", "casting", "http://127.0.0.1:9/jwks.json")
            .with_fetch_timeout(std::time::Duration::from_secs(2));
        RequirePermission::new(Arc::new(TokenVerifier::new(&settings).unwrap()), GET_MOVIES)
    }

    #[tokio::test]
    async fn rejected_request_never_reaches_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let app = Router::new().route(
            "/movies",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    "ok"
                }
            })
            .route_layer(axum::middleware::from_fn_with_state(
                guard(),
                require_permission,
            )),
        );

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/movies").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/movies")
                    .header(AUTHORIZATION, "Token abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
