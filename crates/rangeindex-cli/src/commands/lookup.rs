//! Lookup command - show indexed ranges for identifiers

use anyhow::Result;
use rangeindex_core::{format_partition_date, DateRange, ReindexConfig};
use rangeindex_db::RangeIndexDb;
use std::collections::HashMap;

use crate::cli::{Cli, OutputFormat};
use crate::output::colors;

pub fn run(cli: &Cli, config: &ReindexConfig, ids: &[String]) -> Result<()> {
    let db = RangeIndexDb::open(config.index_path())?;

    let mut found: HashMap<String, DateRange> = HashMap::new();
    db.for_each(ids, |range| {
        found.insert(range.id().to_string(), range);
    })?;

    match cli.format {
        OutputFormat::Human => {
            for id in ids {
                match found.get(id) {
                    Some(range) => println!(
                        "{}  {} .. {}  ({} days)",
                        colors::id(id),
                        colors::date(&format_partition_date(range.from())),
                        colors::date(&format_partition_date(range.to())),
                        range.days()
                    ),
                    None => println!("{}  {}", colors::id(id), colors::label("not indexed")),
                }
            }
        }
        OutputFormat::Json => {
            let output: Vec<_> = ids
                .iter()
                .map(|id| match found.get(id) {
                    Some(range) => serde_json::json!({
                        "id": id,
                        "from": format_partition_date(range.from()),
                        "to": format_partition_date(range.to()),
                    }),
                    None => serde_json::json!({ "id": id, "from": null, "to": null }),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Minimal => {
            for id in ids {
                match found.get(id) {
                    Some(range) => println!(
                        "{}\t{}\t{}",
                        id,
                        format_partition_date(range.from()),
                        format_partition_date(range.to())
                    ),
                    None => println!("{}\t-\t-", id),
                }
            }
        }
    }

    Ok(())
}
