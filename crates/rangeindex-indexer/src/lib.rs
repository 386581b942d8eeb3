//! rangeindex-indexer - Reindex pipeline for the date-range index
//!
//! This crate owns all **write** operations: it scans the dated partitions of
//! a store and replaces the index file with one row per identifier holding
//! the first and last date it was seen on. The companion `rangeindex-db`
//! crate provides read-only access to the finished index.

pub mod accumulator;
pub mod builder;
pub mod discovery;
pub mod error;
pub mod index_store;
pub mod partition;
pub mod progress;
pub mod reindex;
pub mod schema;
pub mod writer;

pub use accumulator::RangeAccumulator;
pub use builder::{build_index, BUILD_LABEL};
pub use discovery::find_partition_dates;
pub use error::{IndexStoreError, PartitionError, StoreAccessError};
pub use index_store::{IndexSession, IndexStore, SqliteIndexStore};
pub use partition::{IdentifierSource, PartitionProvider, PartitionWriter, SqlitePartitionProvider};
pub use progress::{LogProgress, LogProgressFactory, NoProgress, Progress, ProgressFactory};
pub use reindex::{ReindexSummary, Reindexer};
pub use schema::DB_VERSION;
pub use writer::{write_index, SAVE_LABEL};
