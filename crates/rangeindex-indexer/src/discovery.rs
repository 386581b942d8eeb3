//! Partition discovery
//!
//! Lists the immediate children of the store's base directory and keeps
//! those whose names are partition dates.

use chrono::NaiveDate;
use rangeindex_core::parse_partition_date;
use std::io::{Error, ErrorKind};
use std::path::Path;
use walkdir::WalkDir;

use crate::error::StoreAccessError;

/// Find all partition dates under `base_dir`, oldest first.
///
/// Names that are not `YYYY-MM-DD` dates are skipped. Failing to list the
/// directory itself is an error.
pub fn find_partition_dates(base_dir: &Path) -> Result<Vec<NaiveDate>, StoreAccessError> {
    let list_error = |source: Error| StoreAccessError::ListDates {
        dir: base_dir.to_path_buf(),
        source,
    };

    // walkdir yields nothing below a plain file, so check the root first
    let metadata = std::fs::metadata(base_dir).map_err(list_error)?;
    if !metadata.is_dir() {
        return Err(list_error(Error::new(
            ErrorKind::NotADirectory,
            "store path is not a directory",
        )));
    }

    let mut dates = Vec::new();
    let mut skipped = 0usize;

    for entry in WalkDir::new(base_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| list_error(e.into()))?;

        match entry.file_name().to_str().and_then(parse_partition_date) {
            Some(date) => dates.push(date),
            None => skipped += 1,
        }
    }

    dates.sort_unstable();
    dates.dedup();

    tracing::info!(
        dir = %base_dir.display(),
        partitions = dates.len(),
        skipped,
        "discovered partitions"
    );

    Ok(dates)
}
