// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fine-grained permission checks.
//!
//! Permissions are flat strings such as `post:movies`. A route declares the
//! one it requires; the caller's token grants a set of them. Membership is
//! exact and case-sensitive, with no wildcard or hierarchy semantics.

use super::{AuthError, DecodedClaims};

pub const GET_MOVIES: Permission = Permission::from_static("get:movies");
pub const POST_MOVIES: Permission = Permission::from_static("post:movies");
pub const PATCH_MOVIES: Permission = Permission::from_static("patch:movies");
pub const DELETE_MOVIES: Permission = Permission::from_static("delete:movies");
pub const GET_ACTORS: Permission = Permission::from_static("get:actors");
pub const POST_ACTORS: Permission = Permission::from_static("post:actors");
pub const PATCH_ACTORS: Permission = Permission::from_static("patch:actors");
pub const DELETE_ACTORS: Permission = Permission::from_static("delete:actors");

/// A required permission declared by a route. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission(std::borrow::Cow<'static, str>);

/// Rejected attempt to declare an empty permission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("permission must not be empty")]
pub struct EmptyPermission;

impl Permission {
    /// Declare a permission from a literal. Panics at compile time (in const
    /// context) or at startup if `value` is empty.
    pub const fn from_static(value: &'static str) -> Self {
        assert!(!value.is_empty(), "permission must not be empty");
        Self(std::borrow::Cow::Borrowed(value))
    }

    pub fn new(value: impl Into<String>) -> Result<Self, EmptyPermission> {
        let value = value.into();
        if value.is_empty() {
            return Err(EmptyPermission);
        }
        Ok(Self(std::borrow::Cow::Owned(value)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decide whether verified `claims` satisfy `required`.
///
/// A token without any `permissions` claim is malformed for this API (400);
/// an explicit empty list is a valid but unprivileged token (403).
pub fn authorize(claims: &DecodedClaims, required: &Permission) -> Result<(), AuthError> {
    let Some(granted) = claims.permissions.as_ref() else {
        return Err(AuthError::PermissionsClaimMissing);
    };

    if !granted.contains(required.as_str()) {
        return Err(AuthError::PermissionDenied);
    }

    Ok(())
}
