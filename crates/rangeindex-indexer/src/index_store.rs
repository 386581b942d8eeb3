//! Destination index store
//!
//! The writer only sees [`IndexStore`] and [`IndexSession`]. The SQLite
//! implementation keeps one row per identifier in `date_ranges`, with the
//! range packed by [`rangeindex_core::encode_range`].

use chrono::NaiveDate;
use rangeindex_core::encode_range;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

use crate::error::IndexStoreError;
use crate::schema;

/// Factory for write sessions against the index at [`path`](IndexStore::path)
pub trait IndexStore: Send + Sync {
    /// Location of the index on disk
    fn path(&self) -> &Path;

    fn open_write_session(&self) -> Result<Box<dyn IndexSession>, IndexStoreError>;
}

/// Exclusive write session; closed on drop.
///
/// Failures are reported as `false` without detail; the row or commit is
/// treated as not persisted.
pub trait IndexSession {
    fn save(&mut self, id: &str, from: NaiveDate, to: NaiveDate) -> bool;

    fn commit(&mut self) -> bool;
}

/// Index stored in a single SQLite file
#[derive(Debug, Clone)]
pub struct SqliteIndexStore {
    path: PathBuf,
}

impl SqliteIndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl IndexStore for SqliteIndexStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn open_write_session(&self) -> Result<Box<dyn IndexSession>, IndexStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        // Rollback journal keeps the index a single file, so it can be moved
        // aside and restored as a unit.
        conn.execute_batch(
            "PRAGMA journal_mode = DELETE;
             PRAGMA synchronous = FULL;",
        )?;

        schema::init_index_schema(&conn)?;
        conn.execute_batch("BEGIN IMMEDIATE")?;

        Ok(Box::new(SqliteIndexSession {
            conn,
            committed: false,
        }))
    }
}

struct SqliteIndexSession {
    conn: Connection,
    committed: bool,
}

impl IndexSession for SqliteIndexSession {
    fn save(&mut self, id: &str, from: NaiveDate, to: NaiveDate) -> bool {
        let range = encode_range(from, to);
        match self.conn.execute(
            "INSERT OR REPLACE INTO date_ranges (id, range) VALUES (?1, ?2)",
            rusqlite::params![id, &range[..]],
        ) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(id, error = %e, "failed to save date range");
                false
            }
        }
    }

    fn commit(&mut self) -> bool {
        if self.committed {
            return true;
        }

        let now = chrono::Utc::now().to_rfc3339();
        let result = schema::write_metadata(&self.conn, "last_reindexed", &now)
            .and_then(|_| self.conn.execute_batch("COMMIT"));

        match result {
            Ok(()) => {
                self.committed = true;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to commit index");
                false
            }
        }
    }
}
