//! Index write phase
//!
//! Replaces the destination index with a freshly built one. The previous
//! index is moved to `<index>.bak` first and moved back if anything about
//! the write fails, so the destination always holds either the complete old
//! index or the complete new one.

use rangeindex_core::{backup_path_for, DateRange};
use std::io::ErrorKind;
use std::path::Path;

use crate::error::StoreAccessError;
use crate::index_store::IndexStore;
use crate::progress::ProgressFactory;

/// Progress label for the write phase
pub const SAVE_LABEL: &str = "Saving index";

/// Persist `ranges` into `store`, replacing its current contents.
///
/// Every range is saved even after a failure so the whole batch is
/// attempted; any failed save or a failed commit restores the previous
/// index and returns [`StoreAccessError::WriteFailed`].
pub fn write_index(
    ranges: &[DateRange],
    store: &dyn IndexStore,
    progress: &dyn ProgressFactory,
) -> Result<usize, StoreAccessError> {
    let index_path = store.path();
    let backup_path = backup_path_for(index_path);
    let progress = progress.create(SAVE_LABEL, ranges.len());

    backup_index(index_path, &backup_path)?;

    let mut session = match store.open_write_session() {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "could not open index for writing");
            restore_index(index_path, &backup_path)?;
            return Err(StoreAccessError::OpenSession(e));
        }
    };

    let mut status = true;
    for range in ranges {
        status &= session.save(range.id(), range.from(), range.to());
        progress.step();
    }
    status &= session.commit();
    drop(session);

    if !status {
        restore_index(index_path, &backup_path)?;
        return Err(StoreAccessError::WriteFailed);
    }

    delete_backup(&backup_path)?;

    tracing::info!(
        index = %index_path.display(),
        ranges = ranges.len(),
        "wrote index"
    );
    Ok(ranges.len())
}

/// Move the current index aside. A leftover backup from an earlier run is
/// never overwritten: it may be the only copy of the index.
fn backup_index(index_path: &Path, backup_path: &Path) -> Result<(), StoreAccessError> {
    if backup_path.exists() {
        return Err(StoreAccessError::Backup {
            path: backup_path.to_path_buf(),
            source: std::io::Error::new(
                ErrorKind::AlreadyExists,
                "backup from a previous run already exists",
            ),
        });
    }

    if !index_path.exists() {
        tracing::debug!(index = %index_path.display(), "no existing index to back up");
        return Ok(());
    }

    std::fs::rename(index_path, backup_path).map_err(|source| StoreAccessError::Backup {
        path: backup_path.to_path_buf(),
        source,
    })?;

    tracing::debug!(backup = %backup_path.display(), "backed up index");
    Ok(())
}

fn delete_backup(backup_path: &Path) -> Result<(), StoreAccessError> {
    remove_if_exists(backup_path).map_err(|source| StoreAccessError::DeleteBackup {
        path: backup_path.to_path_buf(),
        source,
    })
}

/// Discard whatever was written to `index_path` and put the backup back
fn restore_index(index_path: &Path, backup_path: &Path) -> Result<(), StoreAccessError> {
    let restore = || -> std::io::Result<bool> {
        remove_if_exists(index_path)?;
        if backup_path.exists() {
            std::fs::rename(backup_path, index_path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    };

    match restore() {
        Ok(true) => {
            tracing::warn!(index = %index_path.display(), "index write failed, previous index restored");
            Ok(())
        }
        Ok(false) => {
            tracing::warn!(index = %index_path.display(), "index write failed, no previous index to restore");
            Ok(())
        }
        Err(source) => {
            tracing::error!(backup = %backup_path.display(), error = %source, "failed to restore index");
            Err(StoreAccessError::Restore {
                backup: backup_path.to_path_buf(),
                source,
            })
        }
    }
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        result => result,
    }
}
