use tracing::trace;

use crate::models::TransactionRecord;
use crate::pipeline::PipelineError;
use crate::stats::{sorted_amounts, IqrBounds};

/// Drops records whose amount falls outside the batch's IQR fence.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlierFilter;

impl OutlierFilter {
    /// Returns the kept records (in input order) and the fence used, if any.
    ///
    /// An empty input yields an empty output with no fence.
    ///
    /// # Errors
    /// Returns `Processing` if the fence overflows the decimal range.
    pub fn filter(&self, records: Vec<TransactionRecord>) -> Result<(Vec<TransactionRecord>, Option<IqrBounds>), PipelineError> {
        if records.is_empty() {
            return Ok((records, None));
        }

        let bounds = IqrBounds::from_sorted(&sorted_amounts(&records))
            .ok_or_else(|| PipelineError::processing("Amount range overflows the IQR fence"))?;

        let kept = records.into_iter()
            .filter(|record| {
                let inside = bounds.contains(record.amount);

                if !inside {
                    trace!("Dropping outlier [{}] with amount [{}]", record.transaction_id, record.amount);
                }

                inside
            })
            .collect();

        Ok((kept, Some(bounds)))
    }
}
