use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim, WriterBuilder};
use tracing::{debug, error, warn};

use crate::models::{BatchCapabilities, RawBatch, TransactionRecord};
use crate::pipeline::PipelineError;
use crate::storage::{Partition, PartitionStore};

/// Reads a delimited file into an untyped batch.
///
/// Rows of any width are accepted; rows that cannot be decoded are logged and skipped.
pub fn read_raw_batch(path: &Path) -> Result<RawBatch, PipelineError> {
    let file = File::open(path)
        .map_err(|error| PipelineError::processing(format!("Error opening CSV at path: {} | {error}", path.display())))?;

    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let columns = reader.headers()?.iter().map(str::to_string).collect();
    let mut batch = RawBatch::new(columns, Vec::new());

    for result in reader.records() {
        match result {
            Ok(record) => batch.push_row(record.iter().map(str::to_string).collect()),
            Err(error) => error!("CSV read error in [{}]: {error}", path.display())
        }
    }

    debug!("Read {} rows from [{}]", batch.len(), path.display());

    Ok(batch)
}

pub fn write_raw_batch(path: &Path, batch: &RawBatch) -> Result<(), PipelineError> {
    let mut writer = WriterBuilder::new().flexible(true).from_path(path)?;

    writer.write_record(batch.columns())?;

    for row in batch.rows() {
        writer.write_record(row)?;
    }

    writer.flush()?;

    Ok(())
}

/// Writes each non-empty partition as `<dir>/<prefix>_<stamp>.csv`.
#[derive(Debug, Clone)]
pub struct CsvPartitionStore {
    processed_dir: PathBuf,
    suspicious_dir: PathBuf
}

impl CsvPartitionStore {
    pub fn new(processed_dir: impl Into<PathBuf>, suspicious_dir: impl Into<PathBuf>) -> Self {
        Self {
            processed_dir: processed_dir.into(),
            suspicious_dir: suspicious_dir.into()
        }
    }

    pub fn path_for(&self, partition: Partition, stamp: &str) -> PathBuf {
        let directory = match partition {
            Partition::Normal => &self.processed_dir,
            Partition::Suspicious => &self.suspicious_dir
        };

        directory.join(format!("{}_{stamp}.csv", partition.prefix()))
    }
}

impl PartitionStore for CsvPartitionStore {
    /// The partition only appears under its final name once it is fully written.
    fn save(&self, partition: Partition, stamp: &str, records: &[TransactionRecord], capabilities: &BatchCapabilities) -> Result<Option<PathBuf>, PipelineError> {
        if records.is_empty() {
            return Ok(None);
        }

        let path = self.path_for(partition, stamp);
        let staging = path.with_extension("csv.part");

        if let Err(error) = write_partition(&staging, records, capabilities) {
            if staging.exists() {
                if let Err(cleanup) = fs::remove_file(&staging) {
                    warn!("Could not remove staging file [{}]: {cleanup}", staging.display());
                }
            }

            return Err(error);
        }

        fs::rename(&staging, &path)?;

        Ok(Some(path))
    }

    fn discard(&self, path: &Path) -> Result<(), PipelineError> {
        fs::remove_file(path)
            .map_err(|error| PipelineError::processing(format!("Error discarding partition at path: {} | {error}", path.display())))
    }
}

fn write_partition(path: &Path, records: &[TransactionRecord], capabilities: &BatchCapabilities) -> Result<(), PipelineError> {
    let mut writer = WriterBuilder::new().from_path(path)?;

    writer.write_record(TransactionRecord::header(capabilities))?;

    for record in records {
        writer.write_record(record.to_row(capabilities))?;
    }

    writer.flush()?;

    Ok(())
}
