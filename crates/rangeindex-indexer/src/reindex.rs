//! Full reindex: discover partitions, build ranges, replace the index

use rangeindex_core::ReindexConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::builder::build_index;
use crate::discovery::find_partition_dates;
use crate::error::StoreAccessError;
use crate::index_store::{IndexStore, SqliteIndexStore};
use crate::partition::{PartitionProvider, SqlitePartitionProvider};
use crate::progress::ProgressFactory;
use crate::writer::write_index;

/// Outcome of a successful reindex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReindexSummary {
    pub partitions: usize,
    pub ranges: usize,
    pub elapsed: Duration,
}

/// Rebuilds the date-range index from every partition of a store
pub struct Reindexer {
    config: ReindexConfig,
    partitions: Arc<dyn PartitionProvider>,
    index: Arc<dyn IndexStore>,
    progress: Arc<dyn ProgressFactory>,
}

impl Reindexer {
    /// Reindexer over the SQLite partitions and index described by `config`
    pub fn open(config: ReindexConfig, progress: Arc<dyn ProgressFactory>) -> Self {
        let partitions = Arc::new(SqlitePartitionProvider::new(config.base_dir.clone()));
        let index = Arc::new(SqliteIndexStore::new(config.index_path()));
        Self::new(config, partitions, index, progress)
    }

    pub fn new(
        config: ReindexConfig,
        partitions: Arc<dyn PartitionProvider>,
        index: Arc<dyn IndexStore>,
        progress: Arc<dyn ProgressFactory>,
    ) -> Self {
        Self {
            config,
            partitions,
            index,
            progress,
        }
    }

    pub fn config(&self) -> &ReindexConfig {
        &self.config
    }

    /// Rebuild the index from scratch.
    ///
    /// On error the previous index is left as it was, unless the error
    /// [requires manual recovery](StoreAccessError::requires_manual_recovery).
    pub async fn reindex(&self) -> Result<ReindexSummary, StoreAccessError> {
        let started = Instant::now();
        tracing::info!(base_dir = %self.config.base_dir.display(), "reindex started");

        let dates = find_partition_dates(&self.config.base_dir)?;

        let ranges = build_index(
            &dates,
            &self.config.timezone,
            Arc::clone(&self.partitions),
            self.progress.as_ref(),
        )
        .await?;

        let index = Arc::clone(&self.index);
        let progress = Arc::clone(&self.progress);
        let written = tokio::task::spawn_blocking(move || {
            write_index(&ranges, index.as_ref(), progress.as_ref())
        })
        .await
        .map_err(|e| StoreAccessError::WriteTask(e.to_string()))??;

        let summary = ReindexSummary {
            partitions: dates.len(),
            ranges: written,
            elapsed: started.elapsed(),
        };

        tracing::info!(
            partitions = summary.partitions,
            ranges = summary.ranges,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "reindex finished"
        );

        Ok(summary)
    }
}
