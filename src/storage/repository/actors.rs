// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Actor repository.
//!
//! An actor may be cast in at most one movie. The reference is checked on
//! every write and cleared when the movie is deleted.

use redb::{ReadableDatabase, ReadableTable, Table};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{next_id, ACTORS, ACTOR_SEQUENCE, MOVIES};
use super::super::{CatalogDatabase, StorageError, StorageResult};

/// An actor in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Actor {
    /// Unique actor identifier
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub gender: String,
    /// Movie the actor is cast in, if any
    pub movie_id: Option<u64>,
}

/// Validated fields of an actor to create or replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActor {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub movie_id: Option<u64>,
}

impl NewActor {
    fn with_id(&self, id: u64) -> Actor {
        Actor {
            id,
            name: self.name.clone(),
            age: self.age,
            gender: self.gender.clone(),
            movie_id: self.movie_id,
        }
    }
}

/// Repository for actor operations.
pub struct ActorRepository<'a> {
    db: &'a CatalogDatabase,
}

impl<'a> ActorRepository<'a> {
    pub fn new(db: &'a CatalogDatabase) -> Self {
        Self { db }
    }

    /// All actors, ordered by id.
    pub fn list(&self) -> StorageResult<Vec<Actor>> {
        let read_txn = self.db.inner().begin_read()?;
        let table = read_txn.open_table(ACTORS)?;

        let mut actors = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            actors.push(serde_json::from_slice(value.value())?);
        }
        Ok(actors)
    }

    pub fn get(&self, actor_id: u64) -> StorageResult<Actor> {
        let read_txn = self.db.inner().begin_read()?;
        let table = read_txn.open_table(ACTORS)?;
        match table.get(actor_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StorageError::NotFound(format!("Actor {actor_id}"))),
        }
    }

    pub fn exists(&self, actor_id: u64) -> StorageResult<bool> {
        let read_txn = self.db.inner().begin_read()?;
        let table = read_txn.open_table(ACTORS)?;
        Ok(table.get(actor_id)?.is_some())
    }

    /// Insert an actor under a freshly allocated id.
    pub fn create(&self, actor: &NewActor) -> StorageResult<Actor> {
        let write_txn = self.db.inner().begin_write()?;
        let created = {
            let movies = write_txn.open_table(MOVIES)?;
            ensure_movie(&movies, actor.movie_id)?;

            let id = next_id(&write_txn, ACTOR_SEQUENCE)?;
            let created = actor.with_id(id);
            let json = serde_json::to_vec(&created)?;
            let mut table = write_txn.open_table(ACTORS)?;
            table.insert(id, json.as_slice())?;
            created
        };
        write_txn.commit()?;

        tracing::debug!(actor_id = created.id, "Actor created");
        Ok(created)
    }

    /// Replace the fields of an existing actor.
    pub fn update(&self, actor_id: u64, actor: &NewActor) -> StorageResult<Actor> {
        let write_txn = self.db.inner().begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(ACTORS)?;
            if table.get(actor_id)?.is_none() {
                return Err(StorageError::NotFound(format!("Actor {actor_id}")));
            }

            let movies = write_txn.open_table(MOVIES)?;
            ensure_movie(&movies, actor.movie_id)?;

            let updated = actor.with_id(actor_id);
            let json = serde_json::to_vec(&updated)?;
            table.insert(actor_id, json.as_slice())?;
            updated
        };
        write_txn.commit()?;
        Ok(updated)
    }

    pub fn delete(&self, actor_id: u64) -> StorageResult<()> {
        let write_txn = self.db.inner().begin_write()?;
        {
            let mut table = write_txn.open_table(ACTORS)?;
            if table.remove(actor_id)?.is_none() {
                return Err(StorageError::NotFound(format!("Actor {actor_id}")));
            }
        }
        write_txn.commit()?;

        tracing::debug!(actor_id, "Actor deleted");
        Ok(())
    }
}

fn ensure_movie(
    movies: &Table<'_, u64, &'static [u8]>,
    movie_id: Option<u64>,
) -> StorageResult<()> {
    match movie_id {
        Some(id) if movies.get(id)?.is_none() => {
            Err(StorageError::InvalidReference(format!("Movie {id}")))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MovieRepository, NewMovie};

    fn temp_db() -> (CatalogDatabase, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = CatalogDatabase::open(&dir.path().join("catalog.redb")).unwrap();
        (db, dir)
    }

    fn new_actor(name: &str, movie_id: Option<u64>) -> NewActor {
        NewActor {
            name: name.to_string(),
            age: 41,
            gender: "male".to_string(),
            movie_id,
        }
    }

    #[test]
    fn create_and_list() {
        let (db, _dir) = temp_db();
        let repo = ActorRepository::new(&db);

        let first = repo.create(&new_actor("Keanu", None)).unwrap();
        let second = repo.create(&new_actor("Carrie-Anne", None)).unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(repo.list().unwrap(), vec![first, second]);
    }

    #[test]
    fn actor_and_movie_ids_are_separate_sequences() {
        let (db, _dir) = temp_db();
        let movie = MovieRepository::new(&db)
            .create(&NewMovie {
                title: "The Matrix".to_string(),
                release_date: "1999-03-31".to_string(),
            })
            .unwrap();

        let actor = ActorRepository::new(&db)
            .create(&new_actor("Keanu", Some(movie.id)))
            .unwrap();
        assert_eq!(actor.id, 1);
        assert_eq!(actor.movie_id, Some(movie.id));
    }

    #[test]
    fn unknown_movie_reference_is_rejected() {
        let (db, _dir) = temp_db();
        let repo = ActorRepository::new(&db);

        assert!(matches!(
            repo.create(&new_actor("Keanu", Some(7))),
            Err(StorageError::InvalidReference(_))
        ));
        assert!(repo.list().unwrap().is_empty());

        let actor = repo.create(&new_actor("Keanu", None)).unwrap();
        assert!(matches!(
            repo.update(actor.id, &new_actor("Keanu", Some(7))),
            Err(StorageError::InvalidReference(_))
        ));
        assert_eq!(repo.get(actor.id).unwrap().movie_id, None);
    }

    #[test]
    fn update_and_delete() {
        let (db, _dir) = temp_db();
        let repo = ActorRepository::new(&db);
        let actor = repo.create(&new_actor("Draft", None)).unwrap();

        let updated = repo.update(actor.id, &new_actor("Final", None)).unwrap();
        assert_eq!(updated.name, "Final");

        repo.delete(actor.id).unwrap();
        assert!(!repo.exists(actor.id).unwrap());
        assert!(matches!(repo.delete(actor.id), Err(StorageError::NotFound(_))));
        assert!(matches!(
            repo.update(actor.id, &new_actor("x", None)),
            Err(StorageError::NotFound(_))
        ));
    }
}
