use super::{FolderConfig, PipelineConfig};

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::{tempdir, Builder};

#[test]
fn test_default_config_matches_fixed_table() {
    let config = PipelineConfig::default();

    assert_eq!(config.batch_size, 100);
    assert_eq!(config.interval_seconds, 60);
    assert_eq!(config.seed, 2025);
    assert_eq!(config.max_batches, None);
    assert!(!config.recover_semicolon_columns);
    assert_eq!(config.folders.processed, PathBuf::from("./processed"));
}

#[test]
fn test_config_file_overrides_only_given_keys() -> Result<()> {
    let mut file = Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "batch_size = 25")?;
    writeln!(file, "max_batches = 3")?;
    writeln!(file, "[folders]")?;
    writeln!(file, "suspicious = \"/tmp/flagged\"")?;

    let config = PipelineConfig::load_from_path(file.path())?;

    assert_eq!(config.batch_size, 25);
    assert_eq!(config.max_batches, Some(3));
    assert_eq!(config.interval_seconds, 60);
    assert_eq!(config.folders.suspicious, PathBuf::from("/tmp/flagged"));
    assert_eq!(config.folders.processed, PathBuf::from("./processed"));

    Ok(())
}

#[test]
fn test_missing_config_file_is_an_error() {
    assert!(PipelineConfig::load_from_path("definitely_missing_config.toml").is_err());
}

#[test]
fn test_folder_setup_creates_nested_directories() -> Result<()> {
    let root = tempdir()?;
    let folders = FolderConfig {
        transactions: root.path().join("lake/raw"),
        processed: root.path().join("out/processed"),
        suspicious: root.path().join("out/suspicious")
    };

    folders.setup()?;
    folders.setup()?;

    assert!(folders.transactions.is_dir());
    assert!(folders.processed.is_dir());
    assert!(folders.suspicious.is_dir());

    Ok(())
}
