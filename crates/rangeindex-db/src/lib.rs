//! rangeindex-db - Read-only access to the date-range index
//!
//! The index is written by `rangeindex-indexer`; this crate only reads it.

pub mod connection;
pub mod queries;

pub use connection::*;
