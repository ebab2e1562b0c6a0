use super::{recover_semicolon_columns, CleaningPipeline, Normalizer, OutlierFilter, SchemaValidator};

use std::str::FromStr;

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;

use crate::fixtures::{ordinary_rows, raw_batch, raw_row, record};
use crate::models::{RawBatch, CRITICAL_FIELDS};
use crate::pipeline::PipelineError;
use crate::stats::{sorted_amounts, IqrBounds};
use crate::types::TransactionStatus;

fn columns_without(field: &str) -> Vec<String> {
    CRITICAL_FIELDS.iter()
        .filter(|column| **column != field)
        .map(|column| column.to_string())
        .collect()
}

#[test]
fn test_validator_rejects_empty_batch() {
    let result = SchemaValidator::new().validate(raw_batch(Vec::new()));

    assert!(matches!(result, Err(PipelineError::EmptyBatch)));
}

#[test]
fn test_validator_names_missing_status_field() {
    let batch = RawBatch::new(columns_without("status"), vec![vec!["x".to_string(); 8]]);

    match SchemaValidator::new().validate(batch) {
        Err(PipelineError::Schema { missing }) => assert_eq!(missing, vec!["status"]),
        other => panic!("expected schema error, got {other:?}")
    }
}

#[test]
fn test_validator_lists_missing_fields_in_canonical_order() {
    let batch = RawBatch::new(
        vec!["country".to_string(), "amount".to_string(), "extra".to_string()],
        vec![vec!["MX".to_string(), "1".to_string(), "?".to_string()]]
    );

    match SchemaValidator::new().validate(batch) {
        Err(PipelineError::Schema { missing }) => {
            assert_eq!(missing, vec!["transaction_id", "user_id", "merchant_id", "currency", "status", "timestamp", "payment_method"]);
        }
        other => panic!("expected schema error, got {other:?}")
    }
}

#[test]
fn test_validator_accepts_well_formed_batch() -> Result<()> {
    let batch = raw_batch(ordinary_rows(3));
    let validated = SchemaValidator::new().validate(batch.clone())?;

    assert_eq!(validated, batch);

    Ok(())
}

fn collapsed_batch() -> RawBatch {
    let header = CRITICAL_FIELDS.join(";");
    let line = raw_row("TXN1", "U1", "12,5", "approved", "2025-06-01 10:00:00").join(";");
    let cells: Vec<String> = line.split(',').map(str::to_string).collect();

    RawBatch::new(vec![header], vec![cells])
}

#[test]
fn test_semicolon_recovery_is_inert_by_default() {
    let result = SchemaValidator::new().validate(collapsed_batch());

    assert!(matches!(result, Err(PipelineError::Schema { missing }) if missing.len() == CRITICAL_FIELDS.len()));
}

#[test]
fn test_semicolon_recovery_resplits_collapsed_batch_when_enabled() -> Result<()> {
    let recovered = SchemaValidator::new()
        .with_semicolon_recovery(true)
        .validate(collapsed_batch())?;

    assert_eq!(recovered.columns().len(), CRITICAL_FIELDS.len());
    assert_eq!(recovered.rows()[0][3], "12,5");
    assert_eq!(recovered.rows()[0][0], "TXN1");

    Ok(())
}

#[test]
fn test_semicolon_recovery_ignores_multi_column_batches() {
    assert!(recover_semicolon_columns(&raw_batch(ordinary_rows(1))).is_none());
}

#[test]
fn test_normalizer_standardizes_text_and_drops_extra_columns() -> Result<()> {
    let mut columns: Vec<String> = CRITICAL_FIELDS.iter().map(|field| field.to_string()).collect();
    columns.push("ip_address".to_string());

    let row = vec![" txn1 ", "u1", "m9", " 25.10 ", " mxn", "Declined", "2025-06-01 10:00:00", "ewallet ", "br", "10.0.0.1"]
        .into_iter()
        .map(str::to_string)
        .collect();

    let (records, report) = Normalizer.normalize(&RawBatch::new(columns, vec![row]))?;
    let record = records.first().ok_or_else(|| anyhow!("record dropped"))?;

    assert_eq!(report.dropped(), 0);
    assert_eq!(record.transaction_id, "TXN1");
    assert_eq!(record.merchant_id, "M9");
    assert_eq!(record.amount, Decimal::from_str("25.1")?);
    assert_eq!(record.currency, "MXN");
    assert_eq!(record.status, TransactionStatus::Declined);
    assert_eq!(record.payment_method, "EWALLET");
    assert_eq!(record.country, "BR");
    assert_eq!(record.security_code, None);

    Ok(())
}

#[test]
fn test_normalizer_drops_unusable_rows() -> Result<()> {
    let rows = vec![
        raw_row("TXN1", "U1", "10.00", "approved", "2025-06-01 10:00:00"),
        raw_row("TXN2", "", "10.00", "approved", "2025-06-01 10:00:00"),
        raw_row("TXN3", "U3", "ten", "approved", "2025-06-01 10:00:00"),
        raw_row("TXN4", "U4", "10.00", "approved", "not a date"),
        raw_row("TXN5", "U5", "10.00", "chargeback", "2025-06-01 10:00:00"),
        raw_row("TXN6", "U6", "NaN", "approved", "2025-06-01 10:00:00"),
    ];

    let (records, report) = Normalizer.normalize(&raw_batch(rows))?;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].transaction_id, "TXN1");
    assert_eq!(report.missing_fields, 2);
    assert_eq!(report.invalid_amount, 1);
    assert_eq!(report.invalid_timestamp, 1);
    assert_eq!(report.invalid_status, 1);

    Ok(())
}

#[test]
fn test_normalizer_keeps_first_of_duplicates_in_input_order() -> Result<()> {
    let rows = vec![
        raw_row("TXN2", "U2", "5", "approved", "2025-06-01 09:00:00"),
        raw_row("TXN1", "U1", "10.00", "approved", "2025-06-01 10:00:00"),
        raw_row(" txn1", "u1 ", "10.0", "APPROVED", "2025-06-01T10:00:00"),
        raw_row("TXN3", "U3", "7", "pending", "2025-06-01 11:00:00"),
    ];

    let (records, report) = Normalizer.normalize(&raw_batch(rows))?;
    let ids: Vec<&str> = records.iter().map(|record| record.transaction_id.as_str()).collect();

    assert_eq!(ids, vec!["TXN2", "TXN1", "TXN3"]);
    assert_eq!(report.duplicates, 1);

    Ok(())
}

#[test]
fn test_normalizer_carries_optional_rule_columns() -> Result<()> {
    let mut columns: Vec<String> = CRITICAL_FIELDS.iter().map(|field| field.to_string()).collect();
    columns.push("security_code".to_string());
    columns.push("merchant_country".to_string());

    let mut with_values = raw_row("TXN1", "U1", "10", "approved", "2025-06-01 10:00:00");
    with_values.extend(["fraud ".to_string(), "br".to_string()]);
    let mut with_nulls = raw_row("TXN2", "U2", "10", "approved", "2025-06-01 10:00:00");
    with_nulls.push("".to_string());

    let (records, _) = Normalizer.normalize(&RawBatch::new(columns, vec![with_values, with_nulls]))?;

    assert_eq!(records[0].security_code.as_deref(), Some("FRAUD"));
    assert_eq!(records[0].merchant_country.as_deref(), Some("BR"));
    assert_eq!(records[1].security_code, None);
    assert_eq!(records[1].merchant_country, None);

    Ok(())
}

#[test]
fn test_outlier_filter_removes_amounts_outside_fence() -> Result<()> {
    let amounts = ["10", "12", "14", "16", "18", "20", "22", "500"];
    let records = amounts.iter().enumerate()
        .map(|(index, amount)| record(&format!("TXN{index}"), "U1", amount, TransactionStatus::Approved, "2025-06-01 10:00:00"))
        .collect::<Result<Vec<_>>>()?;

    let (kept, bounds) = OutlierFilter.filter(records)?;
    let bounds = bounds.ok_or_else(|| anyhow!("fence missing"))?;

    assert_eq!(kept.len(), 7);
    assert!(kept.iter().all(|record| bounds.contains(record.amount)));
    assert!(kept.iter().all(|record| record.transaction_id != "TXN7"));

    Ok(())
}

#[test]
fn test_outlier_filter_passes_empty_batch_through() -> Result<()> {
    let (kept, bounds) = OutlierFilter.filter(Vec::new())?;

    assert!(kept.is_empty());
    assert!(bounds.is_none());

    Ok(())
}

#[test]
fn test_outlier_filter_keeps_single_record() -> Result<()> {
    let only = record("TXN1", "U1", "99999", TransactionStatus::Approved, "2025-06-01 10:00:00")?;
    let (kept, _) = OutlierFilter.filter(vec![only])?;

    assert_eq!(kept.len(), 1);

    Ok(())
}

#[test]
fn test_cleaning_drops_row_missing_merchant_id() -> Result<()> {
    let mut rows = ordinary_rows(99);
    let mut broken = raw_row("TXN9999", "user_broken", "45.00", "approved", "2025-06-01 12:00:00");
    broken[2] = String::new();
    rows.insert(40, broken);

    let cleaned = CleaningPipeline::new().clean(raw_batch(rows))?;

    assert_eq!(cleaned.len(), 99);
    assert!(cleaned.records.iter().all(|record| record.transaction_id != "TXN9999"));

    Ok(())
}

#[test]
fn test_cleaned_records_respect_fence_of_their_own_batch() -> Result<()> {
    let mut rows = ordinary_rows(40);
    rows.push(raw_row("TXN_BIG", "U_BIG", "25000", "approved", "2025-06-01 12:00:00"));
    rows.push(raw_row("TXN_NEG", "U_NEG", "-900", "refunded", "2025-06-01 12:00:00"));

    let pipeline = CleaningPipeline::new();
    let validated = SchemaValidator::new().validate(raw_batch(rows.clone()))?;
    let (normalized, _) = Normalizer.normalize(&validated)?;
    let bounds = IqrBounds::from_sorted(&sorted_amounts(&normalized)).ok_or_else(|| anyhow!("fence missing"))?;

    let cleaned = pipeline.clean(raw_batch(rows))?;

    assert_eq!(cleaned.len(), 40);
    assert!(cleaned.records.iter().all(|record| bounds.contains(record.amount)));

    Ok(())
}

#[test]
fn test_cleaning_is_idempotent_on_cleaned_batch() -> Result<()> {
    let mut rows = ordinary_rows(30);
    rows.push(rows[3].clone());
    rows.push(raw_row("TXN_BAD", "U", "oops", "approved", "2025-06-01 12:00:00"));

    let pipeline = CleaningPipeline::new();
    let once = pipeline.clean(raw_batch(rows))?;
    let twice = pipeline.clean(once.to_raw())?;

    assert_eq!(once, twice);

    Ok(())
}

#[test]
fn test_cleaning_of_all_unusable_rows_yields_empty_batch() -> Result<()> {
    let rows = vec![raw_row("TXN1", "U1", "", "approved", "2025-06-01 10:00:00")];
    let cleaned = CleaningPipeline::new().clean(raw_batch(rows))?;

    assert!(cleaned.is_empty());

    Ok(())
}
