// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded catalog database backed by redb.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};

use super::StorageResult;

// =============================================================================
// Table Definitions
// =============================================================================

/// Movies: id → serialized Movie (JSON bytes).
pub(crate) const MOVIES: TableDefinition<u64, &[u8]> = TableDefinition::new("movies");

/// Actors: id → serialized Actor (JSON bytes).
pub(crate) const ACTORS: TableDefinition<u64, &[u8]> = TableDefinition::new("actors");

/// Id sequences: table name → last id handed out.
const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

pub(crate) const MOVIE_SEQUENCE: &str = "movies";
pub(crate) const ACTOR_SEQUENCE: &str = "actors";

// =============================================================================
// CatalogDatabase
// =============================================================================

/// Embedded ACID catalog database.
pub struct CatalogDatabase {
    db: Database,
}

impl CatalogDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(MOVIES)?;
            let _ = write_txn.open_table(ACTORS)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "Catalog database opened");
        Ok(Self { db })
    }

    pub(crate) fn inner(&self) -> &Database {
        &self.db
    }

    /// Cheap read used by the readiness probe.
    pub fn ping(&self) -> StorageResult<()> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MOVIES)?;
        let _ = table.first()?;
        Ok(())
    }
}

/// Hand out the next id of `sequence` inside an open write transaction.
///
/// Ids start at 1 and are never reused, even after deletes.
pub(crate) fn next_id(txn: &WriteTransaction, sequence: &str) -> StorageResult<u64> {
    let mut table = txn.open_table(SEQUENCES)?;
    let next = table.get(sequence)?.map(|last| last.value()).unwrap_or(0) + 1;
    table.insert(sequence, next)?;
    Ok(next)
}
