//! CLI command implementations

pub mod dates;
pub mod doctor;
pub mod lookup;
pub mod reindex;
pub mod status;
