// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the catalog API. All types derive
//! `ToSchema` for the OpenAPI document.
//!
//! Request fields are `Option` so that an absent field is reported as a
//! 400 by [`MovieRequest::validate`] and [`ActorRequest::validate`] rather
//! than as a deserialization rejection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::storage::{Actor, Movie, NewActor, NewMovie};

// =============================================================================
// Movie Models
// =============================================================================

/// Body of `POST /movies` and `PATCH /movies/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MovieRequest {
    /// Movie title (non-blank).
    pub title: Option<String>,
    /// Release date, e.g. `2024-05-01` (non-blank).
    pub release_date: Option<String>,
}

impl MovieRequest {
    pub fn validate(self) -> Result<NewMovie, ApiError> {
        Ok(NewMovie {
            title: required_text(self.title)?,
            release_date: required_text(self.release_date)?,
        })
    }
}

/// Success envelope carrying movies.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MoviesResponse {
    pub success: bool,
    pub movies: Vec<Movie>,
}

impl MoviesResponse {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self {
            success: true,
            movies,
        }
    }
}

// =============================================================================
// Actor Models
// =============================================================================

/// Body of `POST /actors` and `PATCH /actors/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ActorRequest {
    /// Actor name (non-blank).
    pub name: Option<String>,
    /// Age in years.
    pub age: Option<u32>,
    /// Gender (non-blank).
    pub gender: Option<String>,
    /// Movie the actor is cast in; must exist.
    pub movie_id: Option<u64>,
}

impl ActorRequest {
    pub fn validate(self) -> Result<NewActor, ApiError> {
        let movie_id = self.movie_id.ok_or_else(ApiError::bad_request)?;
        Ok(NewActor {
            name: required_text(self.name)?,
            age: self.age.ok_or_else(ApiError::bad_request)?,
            gender: required_text(self.gender)?,
            movie_id: Some(movie_id),
        })
    }
}

/// Success envelope carrying actors.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActorsResponse {
    pub success: bool,
    pub actors: Vec<Actor>,
}

impl ActorsResponse {
    pub fn new(actors: Vec<Actor>) -> Self {
        Self {
            success: true,
            actors,
        }
    }
}

// =============================================================================
// Shared
// =============================================================================

/// Success envelope of a delete.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub success: bool,
    /// Id of the deleted record.
    pub deleted: u64,
}

impl DeletedResponse {
    pub fn new(deleted: u64) -> Self {
        Self {
            success: true,
            deleted,
        }
    }
}

fn required_text(value: Option<String>) -> Result<String, ApiError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ApiError::bad_request()),
    }
}
