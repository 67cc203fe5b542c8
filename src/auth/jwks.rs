// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Security
//!
//! - JWKS is fetched over HTTPS (enforced by [`crate::config`])
//! - Fetches are bounded by a timeout and fail closed
//! - A fetch or parse failure leaves the previous key set untouched
//!
//! ## Cache Model
//!
//! The key set is an immutable [`KeySet`] snapshot behind
//! `RwLock<Arc<KeySet>>`. Readers clone the `Arc` and release the lock
//! immediately. A refresh fetches and parses outside any lock, then swaps the
//! whole snapshot in one write. Refreshes are single-flight: a caller that
//! waited on the refresh mutex while another caller refreshed reuses that
//! result instead of fetching again.

use std::collections::HashMap;
use std::sync::Arc;

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey};
use tokio::sync::{Mutex, RwLock};

use super::error::AuthError;
use crate::config::AuthSettings;

/// A public signing key published by the identity provider.
#[derive(Clone)]
pub struct SigningKey {
    pub kid: String,
    pub algorithm: Algorithm,
    pub key: DecodingKey,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// Immutable snapshot of the identity provider's keys, indexed by `kid`.
#[derive(Debug, Default)]
pub struct KeySet {
    keys: HashMap<String, Arc<SigningKey>>,
    /// Number of successful fetches that produced this snapshot (0 = never fetched)
    generation: u64,
}

impl KeySet {
    /// Build a key set from a parsed JWKS document.
    ///
    /// Keys without a `kid` or with an unsupported key type are skipped.
    pub fn from_jwks(jwks: &JwkSet, generation: u64) -> Self {
        let mut keys = HashMap::with_capacity(jwks.keys.len());
        for jwk in &jwks.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                tracing::debug!("Skipping JWK without kid");
                continue;
            };
            match jwk_to_decoding_key(jwk) {
                Ok((key, algorithm)) => {
                    keys.insert(
                        kid.clone(),
                        Arc::new(SigningKey {
                            kid,
                            algorithm,
                            key,
                        }),
                    );
                }
                Err(reason) => {
                    tracing::debug!(kid = %kid, reason, "Skipping unusable JWK");
                }
            }
        }
        Self { keys, generation }
    }

    pub fn get(&self, kid: &str) -> Option<Arc<SigningKey>> {
        self.keys.get(kid).cloned()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// JWKS manager with caching.
///
/// Resolves key identifiers to signing keys, fetching the identity
/// provider's JWKS lazily on first use and again on a cache miss.
#[derive(Clone)]
pub struct JwksManager {
    /// JWKS URL
    jwks_url: String,
    /// Current key set snapshot
    cache: Arc<RwLock<Arc<KeySet>>>,
    /// Serializes refreshes; never taken by readers
    refresh_lock: Arc<Mutex<()>>,
    /// HTTP client
    client: reqwest::Client,
}

impl JwksManager {
    /// Create a new JWKS manager from the identity provider settings.
    ///
    /// The HTTP client carries the configured fetch timeout; a timed-out
    /// fetch surfaces as [`AuthError::KeyFetchFailed`].
    pub fn new(settings: &AuthSettings) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(settings.fetch_timeout)
            .connect_timeout(settings.fetch_timeout)
            .build()
            .map_err(|e| AuthError::KeyFetchFailed(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(settings.jwks_url.clone(), client))
    }

    /// Create with a caller-supplied HTTP client.
    pub fn with_http_client(jwks_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            jwks_url: jwks_url.into(),
            cache: Arc::new(RwLock::new(Arc::new(KeySet::default()))),
            refresh_lock: Arc::new(Mutex::new(())),
            client,
        }
    }

    /// Get the JWKS URL.
    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Current snapshot. Never waits on an in-flight fetch.
    async fn snapshot(&self) -> Arc<KeySet> {
        Arc::clone(&*self.cache.read().await)
    }

    /// Resolve the signing key for `kid`.
    ///
    /// A miss triggers at most one refresh (shared with concurrent callers)
    /// before failing with [`AuthError::InvalidKeyId`].
    pub async fn resolve(&self, kid: &str) -> Result<Arc<SigningKey>, AuthError> {
        let current = self.snapshot().await;
        if let Some(key) = current.get(kid) {
            return Ok(key);
        }

        tracing::debug!(kid, generation = current.generation(), "JWKS cache miss");
        let refreshed = self.refresh_after(current.generation()).await?;
        refreshed.get(kid).ok_or(AuthError::InvalidKeyId)
    }

    /// Force refresh the JWKS cache.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let seen = self.snapshot().await.generation();
        self.refresh_after(seen).await.map(|_| ())
    }

    /// Refresh unless a newer snapshot than `seen_generation` already exists.
    async fn refresh_after(&self, seen_generation: u64) -> Result<Arc<KeySet>, AuthError> {
        let _guard = self.refresh_lock.lock().await;

        let current = self.snapshot().await;
        if current.generation() > seen_generation {
            return Ok(current);
        }

        let jwks = self.fetch_jwks().await.inspect_err(|e| {
            tracing::warn!(url = %self.jwks_url, error = %e, "JWKS fetch failed");
        })?;
        let next = Arc::new(KeySet::from_jwks(&jwks, current.generation() + 1));
        tracing::info!(
            keys = next.len(),
            generation = next.generation(),
            "JWKS refreshed"
        );

        *self.cache.write().await = Arc::clone(&next);
        Ok(next)
    }

    /// Fetch JWKS from the endpoint.
    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::KeyFetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeyFetchFailed(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeyFetchFailed(e.to_string()))
    }

    /// Check if JWKS has been fetched at least once.
    pub async fn is_cached(&self) -> bool {
        self.snapshot().await.generation() > 0
    }

    /// Number of usable keys in the current snapshot.
    pub async fn key_count(&self) -> usize {
        self.snapshot().await.len()
    }
}

/// Convert a JWK to a DecodingKey.
fn jwk_to_decoding_key(jwk: &Jwk) -> Result<(DecodingKey, Algorithm), &'static str> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => {
            let key = DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
                .map_err(|_| "invalid RSA components")?;

            let alg = match jwk.common.key_algorithm {
                None | Some(KeyAlgorithm::RS256) => Algorithm::RS256,
                Some(KeyAlgorithm::RS384) => Algorithm::RS384,
                Some(KeyAlgorithm::RS512) => Algorithm::RS512,
                Some(KeyAlgorithm::PS256) => Algorithm::PS256,
                Some(KeyAlgorithm::PS384) => Algorithm::PS384,
                Some(KeyAlgorithm::PS512) => Algorithm::PS512,
                Some(_) => return Err("algorithm does not match RSA key type"),
            };

            Ok((key, alg))
        }
        AlgorithmParameters::EllipticCurve(ec) => {
            let key = DecodingKey::from_ec_components(&ec.x, &ec.y)
                .map_err(|_| "invalid EC components")?;

            let alg = match jwk.common.key_algorithm {
                None | Some(KeyAlgorithm::ES256) => Algorithm::ES256,
                Some(KeyAlgorithm::ES384) => Algorithm::ES384,
                Some(_) => return Err("algorithm does not match EC key type"),
            };

            Ok((key, alg))
        }
        _ => Err("unsupported key type"),
    }
}
