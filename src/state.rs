// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::storage::CatalogDatabase;

/// Shared handler state.
///
/// Cloned per request; both members are reference counted so every clone
/// shares one database handle and one key cache.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<CatalogDatabase>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(db: CatalogDatabase, verifier: TokenVerifier) -> Self {
        Self {
            db: Arc::new(db),
            verifier: Arc::new(verifier),
        }
    }
}
