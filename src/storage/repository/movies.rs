// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Movie repository.

use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{next_id, ACTORS, MOVIES, MOVIE_SEQUENCE};
use super::super::{CatalogDatabase, StorageError, StorageResult};
use super::Actor;

/// A movie in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Movie {
    /// Unique movie identifier
    pub id: u64,
    /// Movie title
    pub title: String,
    /// Release date as supplied by the client (e.g. `2024-05-01`)
    pub release_date: String,
}

/// Validated fields of a movie to create or replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub release_date: String,
}

impl NewMovie {
    fn with_id(&self, id: u64) -> Movie {
        Movie {
            id,
            title: self.title.clone(),
            release_date: self.release_date.clone(),
        }
    }
}

/// Repository for movie operations.
pub struct MovieRepository<'a> {
    db: &'a CatalogDatabase,
}

impl<'a> MovieRepository<'a> {
    pub fn new(db: &'a CatalogDatabase) -> Self {
        Self { db }
    }

    /// All movies, ordered by id.
    pub fn list(&self) -> StorageResult<Vec<Movie>> {
        let read_txn = self.db.inner().begin_read()?;
        let table = read_txn.open_table(MOVIES)?;

        let mut movies = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            movies.push(serde_json::from_slice(value.value())?);
        }
        Ok(movies)
    }

    pub fn get(&self, movie_id: u64) -> StorageResult<Movie> {
        let read_txn = self.db.inner().begin_read()?;
        let table = read_txn.open_table(MOVIES)?;
        match table.get(movie_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StorageError::NotFound(format!("Movie {movie_id}"))),
        }
    }

    pub fn exists(&self, movie_id: u64) -> StorageResult<bool> {
        let read_txn = self.db.inner().begin_read()?;
        let table = read_txn.open_table(MOVIES)?;
        Ok(table.get(movie_id)?.is_some())
    }

    /// Insert a movie under a freshly allocated id.
    pub fn create(&self, movie: &NewMovie) -> StorageResult<Movie> {
        let write_txn = self.db.inner().begin_write()?;
        let created = {
            let id = next_id(&write_txn, MOVIE_SEQUENCE)?;
            let created = movie.with_id(id);
            let json = serde_json::to_vec(&created)?;
            let mut table = write_txn.open_table(MOVIES)?;
            table.insert(id, json.as_slice())?;
            created
        };
        write_txn.commit()?;

        tracing::debug!(movie_id = created.id, "Movie created");
        Ok(created)
    }

    /// Replace the fields of an existing movie.
    pub fn update(&self, movie_id: u64, movie: &NewMovie) -> StorageResult<Movie> {
        let write_txn = self.db.inner().begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(MOVIES)?;
            if table.get(movie_id)?.is_none() {
                return Err(StorageError::NotFound(format!("Movie {movie_id}")));
            }
            let updated = movie.with_id(movie_id);
            let json = serde_json::to_vec(&updated)?;
            table.insert(movie_id, json.as_slice())?;
            updated
        };
        write_txn.commit()?;
        Ok(updated)
    }

    /// Delete a movie and detach every actor cast in it.
    pub fn delete(&self, movie_id: u64) -> StorageResult<()> {
        let write_txn = self.db.inner().begin_write()?;
        let detached = {
            let mut movies = write_txn.open_table(MOVIES)?;
            if movies.remove(movie_id)?.is_none() {
                return Err(StorageError::NotFound(format!("Movie {movie_id}")));
            }

            let mut actors = write_txn.open_table(ACTORS)?;
            let mut cast = Vec::new();
            for entry in actors.iter()? {
                let (_, value) = entry?;
                let actor: Actor = serde_json::from_slice(value.value())?;
                if actor.movie_id == Some(movie_id) {
                    cast.push(actor);
                }
            }

            let detached = cast.len();
            for mut actor in cast {
                actor.movie_id = None;
                let json = serde_json::to_vec(&actor)?;
                actors.insert(actor.id, json.as_slice())?;
            }
            detached
        };
        write_txn.commit()?;

        tracing::debug!(movie_id, detached, "Movie deleted");
        Ok(())
    }
}
