//! Error types for the reindex pipeline

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by the reindex pipeline.
///
/// Every variant is a store-access failure. Discovery and build failures are
/// raised before the destination index is touched; write failures are raised
/// after the previous index has been restored, except for [`Restore`], which
/// means the automatic restore itself failed.
///
/// [`Restore`]: StoreAccessError::Restore
#[derive(Error, Debug)]
pub enum StoreAccessError {
    #[error("Failed to read directory listing from {}: {source}", dir.display())]
    ListDates {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read partition {date}: {source}")]
    Partition {
        date: NaiveDate,
        #[source]
        source: PartitionError,
    },

    #[error("Partition scan task failed: {0}")]
    BuildTask(String),

    #[error("Index write task failed: {0}")]
    WriteTask(String),

    #[error("Failed to backup index file to {}: {source}", path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open index for writing: {0}")]
    OpenSession(#[source] IndexStoreError),

    #[error("Failed to write to index database.")]
    WriteFailed,

    #[error("Failed to delete backup file {}: {source}", path.display())]
    DeleteBackup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Failed to restore index. You need to manually restore from backup file: {}",
        backup.display()
    )]
    Restore {
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreAccessError {
    /// Whether an operator must restore the index from its backup by hand
    pub fn requires_manual_recovery(&self) -> bool {
        matches!(self, StoreAccessError::Restore { .. })
    }
}

/// Errors raised while opening or reading a single partition
#[derive(Error, Debug)]
pub enum PartitionError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid metadata: {0}")]
    Metadata(String),
}

/// Errors raised by the destination index store
#[derive(Error, Debug)]
pub enum IndexStoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_only_restore_requires_manual_recovery() {
        let restore = StoreAccessError::Restore {
            backup: PathBuf::from("/data/index.sqlite.bak"),
            source: std::io::Error::other("disk gone"),
        };
        assert!(restore.requires_manual_recovery());
        assert!(restore
            .to_string()
            .contains("manually restore from backup file: /data/index.sqlite.bak"));

        assert!(!StoreAccessError::WriteFailed.requires_manual_recovery());
    }

    #[test]
    fn test_partition_error_keeps_source() {
        let err = StoreAccessError::Partition {
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            source: PartitionError::Metadata("date mismatch".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Failed to read partition 2023-01-01: Invalid metadata: date mismatch"
        );
        assert!(err.source().is_some());
    }
}
