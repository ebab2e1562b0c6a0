use tracing::warn;

use crate::models::{RawBatch, CRITICAL_FIELDS};
use crate::pipeline::PipelineError;

const RECOVERY_DELIMITER: char = ';';

/// Rejects batches that are empty or lack any critical field.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    recover_semicolon_columns: bool
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opt into re-splitting a batch whose columns collapsed into one semicolon-joined field.
    pub fn with_semicolon_recovery(mut self, enabled: bool) -> Self {
        self.recover_semicolon_columns = enabled;
        self
    }

    /// # Errors
    /// - `EmptyBatch` when the batch has no rows.
    /// - `Schema` listing every missing critical field, in canonical order.
    pub fn validate(&self, batch: RawBatch) -> Result<RawBatch, PipelineError> {
        if batch.is_empty() {
            return Err(PipelineError::EmptyBatch);
        }

        let batch = match self.recover_semicolon_columns {
            true => match recover_semicolon_columns(&batch) {
                Some(recovered) => {
                    warn!("Batch collapsed into a single column, re-split on [{RECOVERY_DELIMITER}] into {} columns", recovered.columns().len());
                    recovered
                }
                None => batch
            },
            false => batch
        };

        let missing = missing_fields(&batch);

        if !missing.is_empty() {
            return Err(PipelineError::schema(missing));
        }

        Ok(batch)
    }
}

pub fn missing_fields(batch: &RawBatch) -> Vec<&'static str> {
    CRITICAL_FIELDS.into_iter()
        .filter(|field| !batch.has_column(field))
        .collect()
}

/// Rebuilds a batch that was read with the wrong delimiter.
///
/// Only applies when the batch has exactly one column whose name contains `;`.
/// Each row's cells are re-joined with `,` before splitting, since the original
/// reader may have cut a line at commas inside values.
pub fn recover_semicolon_columns(batch: &RawBatch) -> Option<RawBatch> {
    let [column] = batch.columns() else {
        return None;
    };

    if !column.contains(RECOVERY_DELIMITER) {
        return None;
    }

    let columns = split(column);
    let rows = batch.rows().iter()
        .map(|row| split(&row.join(",")))
        .collect();

    Some(RawBatch::new(columns, rows))
}

fn split(line: &str) -> Vec<String> {
    line.split(RECOVERY_DELIMITER).map(str::to_string).collect()
}
