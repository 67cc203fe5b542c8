// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the catalog database.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! one redb transaction per call.

pub mod actors;
pub mod movies;

pub use actors::{Actor, ActorRepository, NewActor};
pub use movies::{Movie, MovieRepository, NewMovie};
