//! CLI argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Rebuild and inspect the date-range index of a partitioned store
#[derive(Parser, Debug)]
#[command(name = "rangeindex")]
#[command(version)]
#[command(about = "Rebuild and inspect the date-range index of a partitioned store")]
#[command(propagate_version = true)]
pub struct Cli {
    /// JSON config file (base_dir, index_file, timezone)
    #[arg(long, global = true, env = "RANGEINDEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Store directory holding the dated partitions and the index
    #[arg(long, global = true, env = "RANGEINDEX_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Index file name inside the store directory
    #[arg(long, global = true)]
    pub index_file: Option<String>,

    /// Time zone label the partitions were written in
    #[arg(long, global = true, env = "RANGEINDEX_TIMEZONE")]
    pub timezone: Option<String>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output
    Json,
    /// Minimal text output
    Minimal,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rebuild the index from every partition
    Reindex,

    /// List the partition dates found in the store
    Dates,

    /// Show index status and statistics
    Status,

    /// Show the indexed date range of one or more identifiers
    Lookup {
        /// Identifiers to look up
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Diagnose the store and its index
    Doctor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookup() {
        let cli = Cli::try_parse_from([
            "rangeindex",
            "--base-dir",
            "/data",
            "lookup",
            "meter-1",
            "meter-2",
        ])
        .unwrap();
        assert_eq!(cli.base_dir, Some(PathBuf::from("/data")));
        match cli.command {
            Command::Lookup { ids } => assert_eq!(ids, vec!["meter-1", "meter-2"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_lookup_requires_ids() {
        assert!(Cli::try_parse_from(["rangeindex", "lookup"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["rangeindex", "reindex", "-f", "json", "-q"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet);
    }
}
