//! Doctor command - diagnose the store and its index

use anyhow::Result;
use rangeindex_core::ReindexConfig;
use rangeindex_db::{RangeIndexDb, DB_VERSION};
use rangeindex_indexer::find_partition_dates;

use crate::cli::{Cli, OutputFormat};
use crate::output::colors;

pub fn run(cli: &Cli, config: &ReindexConfig) -> Result<()> {
    let mut checks: Vec<Check> = Vec::new();

    // Check 1: Store directory exists
    let base_exists = config.base_dir.is_dir();
    checks.push(Check {
        name: "Store directory".to_string(),
        passed: base_exists,
        details: if base_exists {
            format!("Found at {}", config.base_dir.display())
        } else {
            format!("Not found at {}", config.base_dir.display())
        },
    });

    // Check 2: Partitions discovered
    if base_exists {
        match find_partition_dates(&config.base_dir) {
            Ok(dates) => {
                let has_dates = !dates.is_empty();
                checks.push(Check {
                    name: "Partitions".to_string(),
                    passed: has_dates,
                    details: match (dates.first(), dates.last()) {
                        (Some(first), Some(last)) => {
                            format!("{} dates, {} to {}", dates.len(), first, last)
                        }
                        _ => "No dated partitions".to_string(),
                    },
                });
            }
            Err(e) => checks.push(Check {
                name: "Partitions".to_string(),
                passed: false,
                details: e.to_string(),
            }),
        }
    }

    // Check 3: Index file exists
    let index_path = config.index_path();
    let index_exists = index_path.exists();
    checks.push(Check {
        name: "Index file".to_string(),
        passed: index_exists,
        details: if index_exists {
            format!("Found at {}", index_path.display())
        } else {
            format!("Not found at {}", index_path.display())
        },
    });

    // Check 4: Index opens with a supported version
    let mut index_opens = false;
    if index_exists {
        match RangeIndexDb::open(&index_path).and_then(|db| db.stats()) {
            Ok(stats) => {
                index_opens = true;
                checks.push(Check {
                    name: "Index opens".to_string(),
                    passed: true,
                    details: format!(
                        "v{} (expected >= v{}), {} identifiers",
                        stats.version, DB_VERSION, stats.range_count
                    ),
                });
            }
            Err(e) => checks.push(Check {
                name: "Index opens".to_string(),
                passed: false,
                details: e.to_string(),
            }),
        }
    }

    // Check 5: No backup left behind by an interrupted write
    let backup = config.backup_path();
    let backup_clear = !backup.exists();
    checks.push(Check {
        name: "No stale backup".to_string(),
        passed: backup_clear,
        details: if backup_clear {
            "None present".to_string()
        } else {
            format!("Found at {}", backup.display())
        },
    });

    let all_passed = checks.iter().all(|c| c.passed);

    match cli.format {
        OutputFormat::Human => {
            println!("{}", colors::header("Range Index Doctor"));
            println!();

            for check in &checks {
                let status = if check.passed {
                    colors::success(&check.name)
                } else {
                    colors::error(&check.name)
                };
                println!("  {} - {}", status, check.details);
            }

            println!();
            if all_passed {
                println!("{}", colors::success("All checks passed"));
            } else {
                println!("{}", colors::error("Some checks failed"));
                println!();
                println!("To fix:");
                if !backup_clear {
                    println!(
                        "  Inspect {} and move it over {} or delete it",
                        backup.display(),
                        index_path.display()
                    );
                } else if !index_exists || !index_opens {
                    println!("  Run: rangeindex reindex");
                } else if !base_exists {
                    println!("  Check --base-dir or RANGEINDEX_BASE_DIR");
                }
            }
        }

        OutputFormat::Json => {
            let output = serde_json::json!({
                "checks": checks.iter().map(|c| serde_json::json!({
                    "name": c.name,
                    "passed": c.passed,
                    "details": c.details
                })).collect::<Vec<_>>(),
                "all_passed": all_passed
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        OutputFormat::Minimal => {
            let failed: Vec<_> = checks.iter().filter(|c| !c.passed).collect();
            if failed.is_empty() {
                println!("ok");
            } else {
                for c in failed {
                    println!("FAIL: {}", c.name);
                }
            }
        }
    }

    Ok(())
}

struct Check {
    name: String,
    passed: bool,
    details: String,
}
