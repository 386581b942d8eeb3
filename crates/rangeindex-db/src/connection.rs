//! Database connection management

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Index not found at {0}")]
    NotFound(PathBuf),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Index not initialized (run: rangeindex reindex)")]
    NotInitialized,

    #[error("Index version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Expected index version
pub const DB_VERSION: i32 = 1;

/// Read-only handle to a built index
pub struct RangeIndexDb {
    pub(crate) conn: Connection,
    path: PathBuf,
}

impl RangeIndexDb {
    /// Open the index at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(DbError::NotFound(path));
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let db = Self { conn, path };
        db.check_version()?;

        Ok(db)
    }

    fn check_version(&self) -> Result<(), DbError> {
        let version: Option<i32> = self
            .conn
            .query_row(
                "SELECT CAST(value AS INTEGER) FROM metadata WHERE key = 'version'",
                [],
                |row| row.get(0),
            )
            .ok();

        match version {
            None => Err(DbError::NotInitialized),
            Some(v) if v < DB_VERSION => Err(DbError::VersionMismatch {
                expected: DB_VERSION,
                found: v,
            }),
            Some(_) => Ok(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the underlying connection (for custom queries)
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Get index statistics
    pub fn stats(&self) -> Result<IndexStats, DbError> {
        let version: i32 = self
            .conn
            .query_row(
                "SELECT CAST(value AS INTEGER) FROM metadata WHERE key = 'version'",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        let range_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM date_ranges", [], |row| row.get(0))?;

        let last_reindexed: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM metadata WHERE key = 'last_reindexed'",
                [],
                |row| row.get(0),
            )
            .ok();

        let db_size = std::fs::metadata(&self.path)
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(IndexStats {
            version,
            range_count,
            last_reindexed,
            db_path: self.path.clone(),
            db_size_bytes: db_size,
        })
    }
}

/// Index statistics
#[derive(Debug, Clone)]
pub struct IndexStats {
    pub version: i32,
    pub range_count: i64,
    pub last_reindexed: Option<String>,
    pub db_path: PathBuf,
    pub db_size_bytes: u64,
}
