//! Status command - show index statistics

use anyhow::Result;
use rangeindex_core::ReindexConfig;
use rangeindex_db::{DbError, RangeIndexDb};

use crate::cli::{Cli, OutputFormat};
use crate::output::colors;

pub fn run(cli: &Cli, config: &ReindexConfig) -> Result<()> {
    let backup = config.backup_path();
    let backup_exists = backup.exists();

    let db = match RangeIndexDb::open(config.index_path()) {
        Ok(db) => db,
        Err(DbError::NotFound(path)) => {
            match cli.format {
                OutputFormat::Human => {
                    println!("{}", colors::error("Index not found"));
                    println!();
                    println!("  {}: {}", colors::label("Expected at"), path.display());
                    if backup_exists {
                        println!(
                            "  {}",
                            colors::warning(&format!("Backup present at {}", backup.display()))
                        );
                    }
                    println!();
                    println!("Build it with:");
                    println!("  rangeindex reindex");
                }
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "status": "not_found",
                        "error": "Index not found",
                        "index_path": path.to_string_lossy(),
                        "backup_present": backup_exists,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Minimal => {
                    eprintln!("not found");
                }
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let stats = db.stats()?;

    match cli.format {
        OutputFormat::Human => {
            println!("{}", colors::header("Index Status"));
            println!();
            println!(
                "  {}: {}",
                colors::label("Database"),
                stats.db_path.display()
            );
            println!(
                "  {}: {}",
                colors::label("Size"),
                colors::format_size(stats.db_size_bytes)
            );
            println!(
                "  {}: {}",
                colors::label("Version"),
                colors::value(&stats.version.to_string())
            );
            println!(
                "  {}: {}",
                colors::label("Identifiers"),
                colors::format_count(stats.range_count)
            );

            if let Some(last) = &stats.last_reindexed {
                println!(
                    "  {}: {}",
                    colors::label("Last reindexed"),
                    colors::value(last)
                );
            }

            println!();
            if backup_exists {
                println!(
                    "{}",
                    colors::warning(&format!(
                        "Stale backup at {} blocks the next reindex",
                        backup.display()
                    ))
                );
            } else {
                println!("{}", colors::success("Index is healthy"));
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "db_path": stats.db_path.to_string_lossy(),
                "db_size_bytes": stats.db_size_bytes,
                "version": stats.version,
                "range_count": stats.range_count,
                "last_reindexed": stats.last_reindexed,
                "backup_present": backup_exists,
                "status": if backup_exists { "stale_backup" } else { "healthy" },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Minimal => {
            println!("{}", stats.db_path.display());
        }
    }

    Ok(())
}
