//! Index build phase
//!
//! Scans every partition concurrently, one blocking task per date, and folds
//! each identifier into a shared [`RangeAccumulator`]. All tasks are joined
//! before the result is returned, whether they succeed or not.

use chrono::NaiveDate;
use rangeindex_core::DateRange;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::accumulator::RangeAccumulator;
use crate::error::{PartitionError, StoreAccessError};
use crate::partition::PartitionProvider;
use crate::progress::ProgressFactory;

/// Progress label for the build phase
pub const BUILD_LABEL: &str = "Building index";

/// Build the date range of every identifier found in the partitions for `dates`.
///
/// If any partition fails, the error for the earliest such date is returned
/// once every scan has finished; later failures are logged.
pub async fn build_index(
    dates: &[NaiveDate],
    timezone: &str,
    partitions: Arc<dyn PartitionProvider>,
    progress: &dyn ProgressFactory,
) -> Result<Vec<DateRange>, StoreAccessError> {
    let progress = progress.create(BUILD_LABEL, dates.len());
    let accumulator = Arc::new(RangeAccumulator::new());
    let mut tasks = JoinSet::new();

    for &date in dates {
        let partitions = Arc::clone(&partitions);
        let accumulator = Arc::clone(&accumulator);
        let progress = Arc::clone(&progress);
        let timezone = timezone.to_string();

        tasks.spawn_blocking(move || {
            let result = scan_partition(partitions.as_ref(), &accumulator, date, &timezone);
            progress.step();
            (date, result)
        });
    }

    let mut failures: Vec<StoreAccessError> = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(count))) => {
                tracing::trace!(ids = count, "partition task finished");
            }
            Ok((date, Err(source))) => {
                failures.push(StoreAccessError::Partition { date, source });
            }
            Err(e) => {
                failures.push(StoreAccessError::BuildTask(e.to_string()));
            }
        }
    }

    if !failures.is_empty() {
        failures.sort_by_key(|f| match f {
            StoreAccessError::Partition { date, .. } => Some(*date),
            _ => None,
        });
        let mut failures = failures.into_iter();
        let first = failures.next();
        for other in failures {
            tracing::error!(error = %other, "partition scan failed");
        }
        if let Some(first) = first {
            return Err(first);
        }
    }

    // Every task has been joined, so this is the only reference left
    let accumulator = Arc::try_unwrap(accumulator)
        .map_err(|_| StoreAccessError::BuildTask("accumulator still shared".to_string()))?;

    tracing::info!(
        partitions = dates.len(),
        ids = accumulator.len(),
        "built index"
    );

    Ok(accumulator.into_snapshot())
}

/// Fold the identifiers of one partition into `accumulator`, returning how
/// many were seen. The partition handle is dropped before returning.
fn scan_partition(
    partitions: &dyn PartitionProvider,
    accumulator: &RangeAccumulator,
    date: NaiveDate,
    timezone: &str,
) -> Result<usize, PartitionError> {
    let Some(mut source) = partitions.open(date, timezone)? else {
        tracing::debug!(%date, "no partition");
        return Ok(0);
    };

    let mut count = 0usize;
    source.for_each_id(&mut |id| {
        accumulator.observe(id, date);
        count += 1;
    })?;

    tracing::debug!(%date, ids = count, "indexed partition");
    Ok(count)
}
