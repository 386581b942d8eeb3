//! Dates command - list partition dates

use anyhow::Result;
use rangeindex_core::{format_partition_date, ReindexConfig};
use rangeindex_indexer::find_partition_dates;

use crate::cli::{Cli, OutputFormat};
use crate::output::colors;

pub fn run(cli: &Cli, config: &ReindexConfig) -> Result<()> {
    let dates = find_partition_dates(&config.base_dir)?;

    match cli.format {
        OutputFormat::Human => {
            if dates.is_empty() {
                println!("{}", colors::warning("No partitions found"));
                return Ok(());
            }

            println!(
                "{} ({})",
                colors::header("Partitions"),
                colors::format_count(dates.len() as i64)
            );
            println!();
            for date in &dates {
                let date = format_partition_date(*date);
                println!("  {}", colors::date(&date));
            }
        }
        OutputFormat::Json => {
            let dates: Vec<String> = dates.iter().map(|d| format_partition_date(*d)).collect();
            let output = serde_json::json!({
                "base_dir": config.base_dir.to_string_lossy(),
                "count": dates.len(),
                "dates": dates,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Minimal => {
            for date in &dates {
                println!("{}", format_partition_date(*date));
            }
        }
    }

    Ok(())
}
