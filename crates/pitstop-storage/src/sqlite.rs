// SPDX-FileCopyrightText: 2026 Pitstop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed key/value store.
//!
//! One [`Database`] owns the connection; any number of [`SqliteStore`]
//! handles share it, each bound to a scope so session and persistent data can
//! live in the same file without colliding.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use pitstop_core::{KeyValueStore, PitstopError};

use crate::migrations::run_migrations;

/// Scope for data that survives across visits.
pub const PERSISTENT_SCOPE: &str = "persistent";

/// Scope for data tied to the current visit.
pub const SESSION_SCOPE: &str = "session";

fn storage_err(e: rusqlite::Error) -> PitstopError {
    PitstopError::Storage {
        source: Box::new(e),
    }
}

/// An open, migrated SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (creating if needed) the database at `path` and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PitstopError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| PitstopError::Storage {
                    source: Box::new(e),
                })?;
            }
        }
        let conn = Connection::open(path).map_err(storage_err)?;
        let db = Self::init(conn)?;
        debug!(path = %path.display(), "SQLite store opened");
        Ok(db)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, PitstopError> {
        Self::init(Connection::open_in_memory().map_err(storage_err)?)
    }

    fn init(mut conn: Connection) -> Result<Self, PitstopError> {
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(storage_err)?;
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(storage_err)?;
        debug!(journal_mode = %mode, "SQLite pragmas applied");
        run_migrations(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// A store handle bound to `scope`.
    pub fn store(&self, scope: &str) -> SqliteStore {
        SqliteStore {
            db: self.clone(),
            scope: scope.to_string(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, PitstopError> {
        self.conn.lock().map_err(|_| PitstopError::Storage {
            source: "database connection lock poisoned".into(),
        })
    }
}

/// A [`KeyValueStore`] over one scope of a [`Database`].
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
    scope: String,
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, PitstopError> {
        let conn = self.db.lock()?;
        conn.query_row(
            "SELECT value FROM kv WHERE scope = ?1 AND key = ?2",
            params![self.scope, key],
            |row| row.get(0),
        )
        .optional()
        .map_err(storage_err)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PitstopError> {
        let conn = self.db.lock()?;
        conn.execute(
            "INSERT INTO kv (scope, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT (scope, key) DO UPDATE SET
                value = excluded.value,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
            params![self.scope, key, value],
        )
        .map_err(storage_err)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PitstopError> {
        let conn = self.db.lock()?;
        conn.execute(
            "DELETE FROM kv WHERE scope = ?1 AND key = ?2",
            params![self.scope, key],
        )
        .map_err(storage_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_replaces_value() {
        let db = Database::open_in_memory().unwrap();
        let store = db.store(PERSISTENT_SCOPE);
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn scopes_are_isolated() {
        let db = Database::open_in_memory().unwrap();
        let persistent = db.store(PERSISTENT_SCOPE);
        let session = db.store(SESSION_SCOPE);

        persistent.set("shared", "p").unwrap();
        session.set("shared", "s").unwrap();
        assert_eq!(persistent.get("shared").unwrap().as_deref(), Some("p"));
        assert_eq!(session.get("shared").unwrap().as_deref(), Some("s"));

        session.remove("shared").unwrap();
        assert!(session.get("shared").unwrap().is_none());
        assert_eq!(persistent.get("shared").unwrap().as_deref(), Some("p"));
    }

    #[test]
    fn remove_missing_key_is_ok() {
        let db = Database::open_in_memory().unwrap();
        let store = db.store(SESSION_SCOPE);
        store.remove("never-written").unwrap();
        assert!(store.get("never-written").unwrap().is_none());
    }
}
