//! Access to the dated partitions of the source store
//!
//! The reindex pipeline only needs the [`PartitionProvider`] and
//! [`IdentifierSource`] traits. [`SqlitePartitionProvider`] is the on-disk
//! implementation: one SQLite database per date at
//! `<base_dir>/<YYYY-MM-DD>/readings.sqlite`.

use chrono::NaiveDate;
use rangeindex_core::{format_partition_date, parse_partition_date, PARTITION_FILE};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

use crate::error::PartitionError;
use crate::schema::{self, METADATA_DATE, METADATA_TIMEZONE};

/// Read-only view of the identifiers stored in one partition.
///
/// The underlying handle is released when the source is dropped.
pub trait IdentifierSource: Send {
    /// Call `f` once for every identifier in the partition, in no particular order
    fn for_each_id(&mut self, f: &mut dyn FnMut(&str)) -> Result<(), PartitionError>;
}

/// Opens partitions by date
pub trait PartitionProvider: Send + Sync {
    /// Open the partition for `date`.
    ///
    /// `Ok(None)` means there is no partition for that date, which callers
    /// treat as an empty partition rather than an error.
    fn open(
        &self,
        date: NaiveDate,
        timezone: &str,
    ) -> Result<Option<Box<dyn IdentifierSource>>, PartitionError>;
}

/// SQLite-backed partitions laid out one directory per date
#[derive(Debug, Clone)]
pub struct SqlitePartitionProvider {
    base_dir: PathBuf,
}

impl SqlitePartitionProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Path of the readings database for `date`
    pub fn partition_path(&self, date: NaiveDate) -> PathBuf {
        self.base_dir
            .join(format_partition_date(date))
            .join(PARTITION_FILE)
    }

    /// Open the partition for `date` for writing, creating it if needed.
    ///
    /// A new partition is stamped with `date` and `timezone`; an existing one
    /// must already carry the same values.
    pub fn create(&self, date: NaiveDate, timezone: &str) -> Result<PartitionWriter, PartitionError> {
        let path = self.partition_path(date);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        schema::init_partition_schema(&conn)?;

        let stored_date = schema::read_metadata(&conn, METADATA_DATE)?;
        let stored_timezone = schema::read_metadata(&conn, METADATA_TIMEZONE)?;
        if stored_date.is_none() && stored_timezone.is_none() {
            schema::write_metadata(&conn, METADATA_DATE, &format_partition_date(date))?;
            schema::write_metadata(&conn, METADATA_TIMEZONE, timezone)?;
        } else {
            check_metadata(stored_date, stored_timezone, date, timezone)?;
        }

        conn.execute_batch("BEGIN")?;
        Ok(PartitionWriter { conn, path })
    }
}

impl PartitionProvider for SqlitePartitionProvider {
    fn open(
        &self,
        date: NaiveDate,
        timezone: &str,
    ) -> Result<Option<Box<dyn IdentifierSource>>, PartitionError> {
        let path = self.partition_path(date);
        if !path.exists() {
            return Ok(None);
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        // `conn` is closed on drop if validation fails
        let stored_date = schema::read_metadata(&conn, METADATA_DATE)?;
        let stored_timezone = schema::read_metadata(&conn, METADATA_TIMEZONE)?;
        check_metadata(stored_date, stored_timezone, date, timezone)?;

        Ok(Some(Box::new(SqlitePartition { conn })))
    }
}

/// Validate the date/time zone stamp of a partition.
///
/// A partition carrying neither value is accepted; one carrying only one of
/// them is corrupt.
fn check_metadata(
    stored_date: Option<String>,
    stored_timezone: Option<String>,
    date: NaiveDate,
    timezone: &str,
) -> Result<(), PartitionError> {
    match (stored_date, stored_timezone) {
        (None, None) => Ok(()),
        (Some(_), None) => Err(PartitionError::Metadata(
            "date defined with no time zone".to_string(),
        )),
        (None, Some(_)) => Err(PartitionError::Metadata(
            "time zone defined with no date".to_string(),
        )),
        (Some(stored_date), Some(stored_timezone)) => {
            let parsed = parse_partition_date(&stored_date).ok_or_else(|| {
                PartitionError::Metadata(format!("{} '{}' is not a date", METADATA_DATE, stored_date))
            })?;

            if parsed != date {
                return Err(PartitionError::Metadata(format!(
                    "{} was '{}', expected '{}'",
                    METADATA_DATE, parsed, date
                )));
            }

            if stored_timezone != timezone {
                return Err(PartitionError::Metadata(format!(
                    "{} was '{}', expected '{}'",
                    METADATA_TIMEZONE, stored_timezone, timezone
                )));
            }

            Ok(())
        }
    }
}

/// Open read-only partition database
struct SqlitePartition {
    conn: Connection,
}

impl IdentifierSource for SqlitePartition {
    fn for_each_id(&mut self, f: &mut dyn FnMut(&str)) -> Result<(), PartitionError> {
        let mut stmt = self.conn.prepare("SELECT DISTINCT id FROM entries")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            f(&id);
        }
        Ok(())
    }
}

/// Write handle to a single partition.
///
/// All writes happen inside one transaction; dropping the writer without
/// calling [`commit`](PartitionWriter::commit) discards them.
pub struct PartitionWriter {
    conn: Connection,
    path: PathBuf,
}

impl PartitionWriter {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store `value` for `(id, tag)`, replacing any previous value
    pub fn write(&self, id: &str, tag: &str, value: &[u8]) -> Result<(), PartitionError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO entries (id, tag, value) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, tag, value],
        )?;
        Ok(())
    }

    pub fn commit(self) -> Result<(), PartitionError> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_partition_date(s).unwrap()
    }

    fn collect_ids(source: &mut dyn IdentifierSource) -> Vec<String> {
        let mut ids = Vec::new();
        source.for_each_id(&mut |id| ids.push(id.to_string())).unwrap();
        ids.sort();
        ids
    }

    #[test]
    fn test_missing_partition_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = SqlitePartitionProvider::new(tmp.path());
        assert!(provider.open(date("2023-01-01"), "UTC").unwrap().is_none());
    }

    #[test]
    fn test_ids_are_distinct() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = SqlitePartitionProvider::new(tmp.path());

        let writer = provider.create(date("2023-01-01"), "UTC").unwrap();
        writer.write("meter-a", "readings", b"1").unwrap();
        writer.write("meter-a", "stats", b"2").unwrap();
        writer.write("meter-b", "readings", b"3").unwrap();
        writer.commit().unwrap();

        let mut source = provider.open(date("2023-01-01"), "UTC").unwrap().unwrap();
        assert_eq!(collect_ids(source.as_mut()), vec!["meter-a", "meter-b"]);
    }

    #[test]
    fn test_uncommitted_writes_are_discarded() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = SqlitePartitionProvider::new(tmp.path());

        {
            let writer = provider.create(date("2023-01-01"), "UTC").unwrap();
            writer.write("meter-a", "readings", b"1").unwrap();
        }

        let mut source = provider.open(date("2023-01-01"), "UTC").unwrap().unwrap();
        assert!(collect_ids(source.as_mut()).is_empty());
    }

    #[test]
    fn test_timezone_mismatch_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = SqlitePartitionProvider::new(tmp.path());
        provider
            .create(date("2023-01-01"), "UTC")
            .unwrap()
            .commit()
            .unwrap();

        let err = provider
            .open(date("2023-01-01"), "Australia/Sydney")
            .err()
            .unwrap();
        assert!(matches!(err, PartitionError::Metadata(_)));
        assert!(err.to_string().contains("timezone was 'UTC'"));

        assert!(provider.create(date("2023-01-01"), "Australia/Sydney").is_err());
    }

    #[test]
    fn test_date_mismatch_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = SqlitePartitionProvider::new(tmp.path());
        provider
            .create(date("2023-01-01"), "UTC")
            .unwrap()
            .commit()
            .unwrap();

        // Move the 2023-01-01 partition into the 2023-01-02 slot
        std::fs::rename(tmp.path().join("2023-01-01"), tmp.path().join("2023-01-02")).unwrap();

        let err = provider.open(date("2023-01-02"), "UTC").err().unwrap();
        assert!(err.to_string().contains("date was '2023-01-01', expected '2023-01-02'"));
    }

    #[test]
    fn test_check_metadata_half_defined() {
        let d = date("2023-01-01");
        assert!(check_metadata(None, None, d, "UTC").is_ok());
        assert!(check_metadata(Some("2023-01-01".into()), None, d, "UTC").is_err());
        assert!(check_metadata(None, Some("UTC".into()), d, "UTC").is_err());
        assert!(check_metadata(Some("garbage".into()), Some("UTC".into()), d, "UTC").is_err());
        assert!(check_metadata(Some("2023-01-01".into()), Some("UTC".into()), d, "UTC").is_ok());
    }
}
