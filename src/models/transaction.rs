use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::models::{BatchCapabilities, CRITICAL_FIELDS, MERCHANT_COUNTRY, SECURITY_CODE};
use crate::types::{format_timestamp, TransactionStatus};

/// Tuple of the nine critical fields; two records with equal keys are duplicates.
pub type CriticalKey<'a> = (&'a str, &'a str, &'a str, Decimal, &'a str, TransactionStatus, NaiveDateTime, &'a str, &'a str);

/// A single payment event after type coercion and text standardization.
///
/// Text fields are trimmed and uppercased. `security_code` and `merchant_country`
/// are only populated when the batch carried those columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Identifier, unique within a batch.
    pub transaction_id: String,
    pub user_id: String,
    pub merchant_id: String,
    pub amount: Decimal,
    /// ISO currency code.
    pub currency: String,
    pub status: TransactionStatus,
    /// Event time as encoded by the source, without timezone normalization.
    pub timestamp: NaiveDateTime,
    pub payment_method: String,
    /// Country of the paying user.
    pub country: String,
    pub security_code: Option<String>,
    /// Country of the merchant, compared against `country` for cross-border checks.
    pub merchant_country: Option<String>
}

impl TransactionRecord {
    pub fn critical_key(&self) -> CriticalKey<'_> {
        (
            &self.transaction_id,
            &self.user_id,
            &self.merchant_id,
            self.amount,
            &self.currency,
            self.status,
            self.timestamp,
            &self.payment_method,
            &self.country
        )
    }

    /// Output column names for a batch with the given capabilities.
    pub fn header(capabilities: &BatchCapabilities) -> Vec<&'static str> {
        let mut header = CRITICAL_FIELDS.to_vec();

        if capabilities.security_code {
            header.push(SECURITY_CODE);
        }

        if capabilities.merchant_country {
            header.push(MERCHANT_COUNTRY);
        }

        header
    }

    /// Output cells, aligned with [`TransactionRecord::header`].
    pub fn to_row(&self, capabilities: &BatchCapabilities) -> Vec<String> {
        let mut row = vec![
            self.transaction_id.clone(),
            self.user_id.clone(),
            self.merchant_id.clone(),
            self.amount.to_string(),
            self.currency.clone(),
            self.status.to_string(),
            format_timestamp(&self.timestamp),
            self.payment_method.clone(),
            self.country.clone()
        ];

        if capabilities.security_code {
            row.push(self.security_code.clone().unwrap_or_default());
        }

        if capabilities.merchant_country {
            row.push(self.merchant_country.clone().unwrap_or_default());
        }

        row
    }
}
