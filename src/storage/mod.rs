mod csv_store;

use std::path::{Path, PathBuf};

use crate::models::{BatchCapabilities, TransactionRecord};
use crate::pipeline::PipelineError;

pub use csv_store::{read_raw_batch, write_raw_batch, CsvPartitionStore};

/// The two output sets of a scored batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Normal,
    Suspicious
}

impl Partition {
    /// File name prefix for this partition.
    pub fn prefix(&self) -> &'static str {
        match self {
            Partition::Normal => "processed",
            Partition::Suspicious => "suspicious"
        }
    }
}

pub trait PartitionStore {
    /// Persists a partition and returns where it went; empty partitions are not written.
    fn save(&self, partition: Partition, stamp: &str, records: &[TransactionRecord], capabilities: &BatchCapabilities) -> Result<Option<PathBuf>, PipelineError>;

    /// Removes a partition written by an earlier `save` of a batch that later failed.
    fn discard(&self, path: &Path) -> Result<(), PipelineError>;
}
