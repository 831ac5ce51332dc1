// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapters for the Pitstop attribution pipeline.
//!
//! Provides the two [`KeyValueStore`](pitstop_core::KeyValueStore) flavours the
//! pipeline is wired with (an in-memory store for session scope and a SQLite
//! store with embedded migrations for persistent scope), the well-known key
//! names, and JSON helpers that degrade corrupt values to "absent".

pub mod json;
pub mod keys;
pub mod memory;
pub mod migrations;
pub mod sqlite;

pub use json::{read_json, read_string, write_json};
pub use memory::MemoryStore;
pub use sqlite::{Database, PERSISTENT_SCOPE, SESSION_SCOPE, SqliteStore};
