use crate::models::{TransactionRecord, MERCHANT_COUNTRY, SECURITY_CODE};
use crate::types::is_null;

/// A batch exactly as read from a delimited source: column names plus untyped cells.
///
/// Rows may be shorter than the header; missing trailing cells read as null.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBatch {
    columns: Vec<String>,
    rows: Vec<Vec<String>>
}

impl RawBatch {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Overwrites a cell, padding the row with empty cells if it is short.
    pub fn set_cell(&mut self, row: usize, column: usize, value: String) {
        if let Some(row) = self.rows.get_mut(row) {
            if row.len() <= column {
                row.resize(column + 1, String::new());
            }

            row[column] = value;
        }
    }

    /// Position of a column, ignoring surrounding whitespace in the header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.trim() == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Returns the cell at `index`, or `None` when it is absent or null.
    pub fn value(row: &[String], index: usize) -> Option<&str> {
        row.get(index)
            .map(String::as_str)
            .filter(|value| !is_null(value))
    }
}

/// Optional columns a batch carries; decides which conditional rules can run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchCapabilities {
    pub security_code: bool,
    pub merchant_country: bool
}

impl BatchCapabilities {
    pub fn detect(batch: &RawBatch) -> Self {
        Self {
            security_code: batch.has_column(SECURITY_CODE),
            merchant_country: batch.has_column(MERCHANT_COUNTRY)
        }
    }
}

/// Records that survived validation, normalization, deduplication and outlier removal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedBatch {
    pub records: Vec<TransactionRecord>,
    pub capabilities: BatchCapabilities
}

impl CleanedBatch {
    pub fn new(records: Vec<TransactionRecord>, capabilities: BatchCapabilities) -> Self {
        Self { records, capabilities }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Renders the batch back into its raw shape, as it would be read from disk.
    pub fn to_raw(&self) -> RawBatch {
        let columns = TransactionRecord::header(&self.capabilities)
            .into_iter()
            .map(str::to_string)
            .collect();

        let rows = self.records.iter()
            .map(|record| record.to_row(&self.capabilities))
            .collect();

        RawBatch::new(columns, rows)
    }
}
