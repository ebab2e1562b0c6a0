use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use tracing::warn;

use crate::models::RawBatch;
use crate::pipeline::{Cleaner, PipelineError, Scorer};
use crate::storage::{Partition, PartitionStore};

/// Counts and written files for one successfully processed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub stamp: String,
    pub raw: usize,
    pub cleaned: usize,
    pub normal: usize,
    pub suspicious: usize,
    pub normal_path: Option<PathBuf>,
    pub suspicious_path: Option<PathBuf>
}

impl Display for BatchReport {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "Batch [{}] loaded {} | cleaned {} | normal {} | suspicious {}",
            self.stamp, self.raw, self.cleaned, self.normal, self.suspicious
        )
    }
}

/// Runs one batch through cleaning, scoring and persistence.
pub struct BatchProcessor<C, S, P> {
    cleaner: C,
    scorer: S,
    store: P
}

impl<C: Cleaner, S: Scorer, P: PartitionStore> BatchProcessor<C, S, P> {
    pub fn new(cleaner: C, scorer: S, store: P) -> Self {
        Self { cleaner, scorer, store }
    }

    /// Partitions are only written once both stages have succeeded, and a batch
    /// whose second partition fails to save leaves neither behind.
    ///
    /// # Errors
    /// Propagates the first stage error unchanged, or a `Processing` error from the store.
    pub fn process(&self, raw: RawBatch, stamp: &str) -> Result<BatchReport, PipelineError> {
        let raw_count = raw.len();
        let cleaned = self.cleaner.clean(raw)?;
        let cleaned_count = cleaned.len();
        let scored = self.scorer.score(cleaned)?;

        let normal_path = self.store.save(Partition::Normal, stamp, &scored.normal, &scored.capabilities)?;
        let suspicious_path = match self.store.save(Partition::Suspicious, stamp, &scored.suspicious, &scored.capabilities) {
            Ok(path) => path,
            Err(error) => {
                if let Some(path) = &normal_path {
                    if let Err(cleanup) = self.store.discard(path) {
                        warn!("Partial batch [{stamp}] left behind: {cleanup}");
                    }
                }

                return Err(error);
            }
        };

        Ok(BatchReport {
            stamp: stamp.to_string(),
            raw: raw_count,
            cleaned: cleaned_count,
            normal: scored.normal.len(),
            suspicious: scored.suspicious.len(),
            normal_path,
            suspicious_path
        })
    }
}
