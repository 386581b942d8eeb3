//! Reindex configuration

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::format_partition_date;

/// Default file name of the index inside the base directory
pub const DEFAULT_INDEX_FILE: &str = "readings-index.sqlite";

/// File name of the readings database inside each partition directory
pub const PARTITION_FILE: &str = "readings.sqlite";

/// Suffix appended to the index path to form its backup path
pub const BACKUP_SUFFIX: &str = ".bak";

/// Default time zone label written to and checked against partitions
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Where the partitioned store and its index live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReindexConfig {
    /// Directory holding one entry per partition date plus the index file
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Index file name, relative to `base_dir`
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Time zone label the partitions were written in
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_index_file() -> String {
    DEFAULT_INDEX_FILE.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Default for ReindexConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            index_file: default_index_file(),
            timezone: default_timezone(),
        }
    }
}

impl ReindexConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_index_file(mut self, index_file: impl Into<String>) -> Self {
        self.index_file = index_file.into();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Full path of the index file
    pub fn index_path(&self) -> PathBuf {
        self.base_dir.join(&self.index_file)
    }

    /// Full path of the index backup taken during a reindex
    pub fn backup_path(&self) -> PathBuf {
        backup_path_for(&self.index_path())
    }

    /// Directory of the partition for `date`
    pub fn partition_dir(&self, date: NaiveDate) -> PathBuf {
        self.base_dir.join(format_partition_date(date))
    }

    /// Readings database of the partition for `date`
    pub fn partition_path(&self, date: NaiveDate) -> PathBuf {
        self.partition_dir(date).join(PARTITION_FILE)
    }
}

/// Backup location for an index file: same directory, `.bak` appended
pub fn backup_path_for(index_path: &Path) -> PathBuf {
    let mut name = index_path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let config = ReindexConfig::new("/data/store");
        let date = NaiveDate::from_ymd_opt(2023, 1, 3).unwrap();

        assert_eq!(
            config.index_path(),
            PathBuf::from("/data/store/readings-index.sqlite")
        );
        assert_eq!(
            config.backup_path(),
            PathBuf::from("/data/store/readings-index.sqlite.bak")
        );
        assert_eq!(
            config.partition_path(date),
            PathBuf::from("/data/store/2023-01-03/readings.sqlite")
        );
    }

    #[test]
    fn test_backup_shares_parent() {
        let index = Path::new("/a/b/index.db");
        let backup = backup_path_for(index);
        assert_eq!(backup.parent(), index.parent());
        assert_eq!(backup, PathBuf::from("/a/b/index.db.bak"));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ReindexConfig =
            serde_json::from_str(r#"{"base_dir": "/srv/readings"}"#).unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/srv/readings"));
        assert_eq!(config.index_file, DEFAULT_INDEX_FILE);
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
    }

    #[test]
    fn test_builders() {
        let config = ReindexConfig::new("/x")
            .with_timezone("Australia/Sydney")
            .with_index_file("ranges.db");
        assert_eq!(config.timezone, "Australia/Sydney");
        assert_eq!(config.index_path(), PathBuf::from("/x/ranges.db"));
    }
}
