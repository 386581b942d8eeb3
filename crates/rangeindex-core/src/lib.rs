//! rangeindex-core - Core types for the date-range index
//!
//! This crate provides the value types shared by the indexer, the read-only
//! index access layer and the CLI. It performs no I/O.

pub mod codec;
pub mod config;
pub mod types;

pub use codec::{decode_range, encode_range, ENCODED_RANGE_LEN};
pub use config::*;
pub use types::*;
