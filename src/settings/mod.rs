//! Runtime settings for the batch loop.
//!
//! Defaults form the fixed in-process table; a TOML file may override any subset.

#[cfg(test)]
mod tests;

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Rows generated per batch.
    pub batch_size: usize,
    /// Pause between batches.
    pub interval_seconds: u64,
    /// Seed for the synthetic batch generator.
    pub seed: u64,
    /// Stop after this many batches; run until interrupted when unset.
    pub max_batches: Option<u64>,
    /// Re-split batches that collapsed into one semicolon-joined column.
    pub recover_semicolon_columns: bool,
    pub folders: FolderConfig
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FolderConfig {
    /// Data lake for raw batches.
    pub transactions: PathBuf,
    /// Normal partition output.
    pub processed: PathBuf,
    /// Suspicious partition output.
    pub suspicious: PathBuf
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            interval_seconds: 60,
            seed: 2025,
            max_batches: None,
            recover_semicolon_columns: false,
            folders: FolderConfig::default()
        }
    }
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            transactions: PathBuf::from("./transactions"),
            processed: PathBuf::from("./processed"),
            suspicious: PathBuf::from("./suspicious")
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file; absent keys keep their defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl FolderConfig {
    /// Creates the three folders if they do not exist yet.
    pub fn setup(&self) -> Result<()> {
        for folder in [&self.transactions, &self.processed, &self.suspicious] {
            create_dir_all(folder).with_context(|| format!("Failed to create folder [{}]", folder.display()))?;
        }

        info!(
            "Folders initialized: data lake [{}], processed [{}], suspicious [{}]",
            self.transactions.display(), self.processed.display(), self.suspicious.display()
        );

        Ok(())
    }
}
