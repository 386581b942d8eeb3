//! Reindex command - rebuild the index from every partition

use anyhow::Result;
use rangeindex_core::ReindexConfig;
use rangeindex_indexer::Reindexer;

use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, progress};

pub async fn run(cli: &Cli, config: ReindexConfig) -> Result<()> {
    let backup = config.backup_path();
    let factory = progress::factory(cli.format == OutputFormat::Human, cli.quiet);
    let reindexer = Reindexer::open(config, factory);

    let summary = match reindexer.reindex().await {
        Ok(summary) => summary,
        Err(e) => {
            let manual = e.requires_manual_recovery();
            match cli.format {
                OutputFormat::Human => {
                    println!("{}", colors::error(&e.to_string()));
                    if manual {
                        println!();
                        println!(
                            "The index could not be restored. Move {} back into place by hand.",
                            backup.display()
                        );
                    }
                }
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "status": "failed",
                        "error": e.to_string(),
                        "requires_manual_recovery": manual,
                        "backup_path": backup.to_string_lossy(),
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Minimal => {
                    eprintln!("failed");
                }
            }
            return Err(e.into());
        }
    };

    let config = reindexer.config();
    match cli.format {
        OutputFormat::Human => {
            println!("{}", colors::header("Reindex Complete"));
            println!();
            println!(
                "  {}: {}",
                colors::label("Index"),
                config.index_path().display()
            );
            println!(
                "  {}: {}",
                colors::label("Partitions"),
                colors::format_count(summary.partitions as i64)
            );
            println!(
                "  {}: {}",
                colors::label("Identifiers"),
                colors::format_count(summary.ranges as i64)
            );
            println!(
                "  {}: {}",
                colors::label("Elapsed"),
                colors::value(&format!("{:.2?}", summary.elapsed))
            );
            println!();
            println!("{}", colors::success("Index replaced"));
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "ok",
                "index_path": config.index_path().to_string_lossy(),
                "partitions": summary.partitions,
                "ranges": summary.ranges,
                "elapsed_ms": summary.elapsed.as_millis() as u64,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Minimal => {
            println!("{} {}", summary.partitions, summary.ranges);
        }
    }

    Ok(())
}
