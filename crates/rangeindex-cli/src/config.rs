//! Configuration loading: JSON file first, then command-line overrides

use anyhow::{Context, Result};
use rangeindex_core::ReindexConfig;

use crate::cli::Cli;

pub fn load_config(cli: &Cli) -> Result<ReindexConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .context(format!("Failed to read config from {}", path.display()))?;
            serde_json::from_str::<ReindexConfig>(&content).context("Failed to parse config")?
        }
        None => ReindexConfig::default(),
    };

    if let Some(base_dir) = &cli.base_dir {
        config.base_dir = base_dir.clone();
    }
    if let Some(index_file) = &cli.index_file {
        config.index_file = index_file.clone();
    }
    if let Some(timezone) = &cli.timezone {
        config.timezone = timezone.clone();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_flags_override_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"base_dir": "/from/file", "timezone": "Australia/Perth"}"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "rangeindex",
            "--config",
            path.to_str().unwrap(),
            "--base-dir",
            "/from/flag",
            "status",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/from/flag"));
        assert_eq!(config.timezone, "Australia/Perth");
        assert_eq!(config.index_file, rangeindex_core::DEFAULT_INDEX_FILE);
    }

    #[test]
    fn test_bad_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let cli =
            Cli::try_parse_from(["rangeindex", "--config", path.to_str().unwrap(), "dates"]).unwrap();
        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
