use std::collections::HashSet;
use std::str::FromStr;

use tracing::trace;

use crate::models::{RawBatch, TransactionRecord, CRITICAL_FIELDS, MERCHANT_COUNTRY, SECURITY_CODE};
use crate::pipeline::PipelineError;
use crate::types::{parse_amount, parse_timestamp, standardize, TransactionStatus};

/// Row counts dropped by each normalization step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    pub input: usize,
    pub missing_fields: usize,
    pub invalid_amount: usize,
    pub invalid_status: usize,
    pub invalid_timestamp: usize,
    pub duplicates: usize
}

impl NormalizationReport {
    pub fn dropped(&self) -> usize {
        self.missing_fields + self.invalid_amount + self.invalid_status + self.invalid_timestamp + self.duplicates
    }
}

struct ColumnMap {
    critical: [usize; CRITICAL_FIELDS.len()],
    security_code: Option<usize>,
    merchant_country: Option<usize>
}

impl ColumnMap {
    fn resolve(batch: &RawBatch) -> Result<Self, PipelineError> {
        let mut critical = [0; CRITICAL_FIELDS.len()];
        let mut missing = Vec::new();

        for (slot, field) in critical.iter_mut().zip(CRITICAL_FIELDS) {
            match batch.column_index(field) {
                Some(index) => *slot = index,
                None => missing.push(field)
            }
        }

        if !missing.is_empty() {
            return Err(PipelineError::schema(missing));
        }

        Ok(Self {
            critical,
            security_code: batch.column_index(SECURITY_CODE),
            merchant_country: batch.column_index(MERCHANT_COUNTRY)
        })
    }
}

/// Projects, types and deduplicates a validated batch.
///
/// Rows with a null critical field, a non-numeric amount, an unknown status or an
/// unparseable timestamp are dropped. Duplicates on the nine critical fields keep
/// their first occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn normalize(&self, batch: &RawBatch) -> Result<(Vec<TransactionRecord>, NormalizationReport), PipelineError> {
        let columns = ColumnMap::resolve(batch)?;
        let mut report = NormalizationReport { input: batch.len(), ..Default::default() };
        let mut candidates = Vec::with_capacity(batch.len());

        for (position, row) in batch.rows().iter().enumerate() {
            match coerce_row(row, &columns) {
                Ok(record) => candidates.push(record),
                Err(reason) => {
                    trace!("Dropping row [{position}]: {reason:?}");
                    match reason {
                        RowRejection::MissingField => report.missing_fields += 1,
                        RowRejection::InvalidAmount => report.invalid_amount += 1,
                        RowRejection::InvalidStatus => report.invalid_status += 1,
                        RowRejection::InvalidTimestamp => report.invalid_timestamp += 1
                    }
                }
            }
        }

        let first_occurrence: Vec<bool> = {
            let mut seen = HashSet::with_capacity(candidates.len());
            candidates.iter()
                .map(|record| seen.insert(record.critical_key()))
                .collect()
        };

        let records: Vec<TransactionRecord> = candidates.into_iter()
            .zip(first_occurrence)
            .filter_map(|(record, keep)| keep.then_some(record))
            .collect();

        report.duplicates = report.input - report.dropped() - records.len();

        Ok((records, report))
    }
}

#[derive(Debug)]
enum RowRejection {
    MissingField,
    InvalidAmount,
    InvalidStatus,
    InvalidTimestamp
}

fn coerce_row(row: &[String], columns: &ColumnMap) -> Result<TransactionRecord, RowRejection> {
    let mut values = [""; CRITICAL_FIELDS.len()];

    for (value, index) in values.iter_mut().zip(columns.critical) {
        *value = RawBatch::value(row, index).ok_or(RowRejection::MissingField)?;
    }

    let [transaction_id, user_id, merchant_id, amount, currency, status, timestamp, payment_method, country] = values;

    Ok(TransactionRecord {
        transaction_id: standardize(transaction_id),
        user_id: standardize(user_id),
        merchant_id: standardize(merchant_id),
        amount: parse_amount(amount).map_err(|_| RowRejection::InvalidAmount)?,
        currency: standardize(currency),
        status: TransactionStatus::from_str(&standardize(status)).map_err(|_| RowRejection::InvalidStatus)?,
        timestamp: parse_timestamp(timestamp).map_err(|_| RowRejection::InvalidTimestamp)?,
        payment_method: standardize(payment_method),
        country: standardize(country),
        security_code: optional_text(row, columns.security_code),
        merchant_country: optional_text(row, columns.merchant_country)
    })
}

fn optional_text(row: &[String], index: Option<usize>) -> Option<String> {
    index.and_then(|index| RawBatch::value(row, index)).map(standardize)
}
