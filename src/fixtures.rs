use std::str::FromStr;

use anyhow::Result;
use rust_decimal::Decimal;

use crate::models::{RawBatch, TransactionRecord, CRITICAL_FIELDS};
use crate::types::{parse_timestamp, TransactionStatus};

/// A well-formed record: merchant `M1`, `MXN`, `CREDIT_CARD`, `MX`.
pub fn record(transaction_id: &str, user_id: &str, amount: &str, status: TransactionStatus, timestamp: &str) -> Result<TransactionRecord> {
    Ok(TransactionRecord {
        transaction_id: transaction_id.to_string(),
        user_id: user_id.to_string(),
        merchant_id: "M1".to_string(),
        amount: Decimal::from_str(amount)?,
        currency: "MXN".to_string(),
        status,
        timestamp: parse_timestamp(timestamp)?,
        payment_method: "CREDIT_CARD".to_string(),
        country: "MX".to_string(),
        security_code: None,
        merchant_country: None
    })
}

/// A raw row aligned with [`CRITICAL_FIELDS`].
pub fn raw_row(transaction_id: &str, user_id: &str, amount: &str, status: &str, timestamp: &str) -> Vec<String> {
    [transaction_id, user_id, "m1", amount, "mxn", status, timestamp, "credit_card", "mx"]
        .iter()
        .map(|value| value.to_string())
        .collect()
}

pub fn raw_batch(rows: Vec<Vec<String>>) -> RawBatch {
    RawBatch::new(CRITICAL_FIELDS.iter().map(|field| field.to_string()).collect(), rows)
}

/// `count` unremarkable rows for distinct users, a minute apart during business hours.
pub fn ordinary_rows(count: usize) -> Vec<Vec<String>> {
    (0..count)
        .map(|index| {
            let amount = format!("{}.00", 40 + index % 20);
            let timestamp = format!("2025-06-01 {:02}:{:02}:00", 10 + index / 60, index % 60);
            raw_row(&format!("txn{index:04}"), &format!("user{index}"), &amount, "approved", &timestamp)
        })
        .collect()
}
