// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Catalog Storage Module
//!
//! Persistent storage for the movie and actor catalog, backed by an embedded
//! redb database (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! ```text
//! movies     u64  → Movie (JSON bytes)
//! actors     u64  → Actor (JSON bytes)
//! sequences  &str → u64   # last id handed out per table
//! ```
//!
//! Every mutating repository call runs in a single write transaction, so a
//! failed call leaves the catalog untouched.

pub mod database;
pub mod repository;

pub use database::CatalogDatabase;
pub use repository::{Actor, ActorRepository, Movie, MovieRepository, NewActor, NewMovie};

/// Errors raised by the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
