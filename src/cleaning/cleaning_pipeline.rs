use tracing::debug;

use crate::cleaning::{Normalizer, OutlierFilter, SchemaValidator};
use crate::models::{BatchCapabilities, CleanedBatch, RawBatch};
use crate::pipeline::PipelineError;

/// Validator, normalizer and outlier filter composed in sequence.
#[derive(Debug, Clone, Default)]
pub struct CleaningPipeline {
    validator: SchemaValidator,
    normalizer: Normalizer,
    outliers: OutlierFilter
}

impl CleaningPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_semicolon_recovery(mut self, enabled: bool) -> Self {
        self.validator = self.validator.with_semicolon_recovery(enabled);
        self
    }

    /// Runs every cleaning step on `raw`.
    ///
    /// Batch-level problems fail immediately; row-level problems drop the row.
    pub fn clean(&self, raw: RawBatch) -> Result<CleanedBatch, PipelineError> {
        let validated = self.validator.validate(raw)?;
        let capabilities = BatchCapabilities::detect(&validated);

        let (records, report) = self.normalizer.normalize(&validated)?;

        debug!(
            "Normalized {} of {} rows (missing fields: {}, bad amount: {}, bad status: {}, bad timestamp: {}, duplicates: {})",
            records.len(), report.input, report.missing_fields, report.invalid_amount,
            report.invalid_status, report.invalid_timestamp, report.duplicates
        );

        let normalized = records.len();
        let (records, bounds) = self.outliers.filter(records)?;

        if let Some(bounds) = bounds {
            debug!("Outlier fence [{}, {}] removed {} rows", bounds.lower, bounds.upper, normalized - records.len());
        }

        Ok(CleanedBatch::new(records, capabilities))
    }
}
