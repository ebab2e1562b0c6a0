use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::types::errors::FieldError;

/// Lifecycle state reported by the payment processor for a transaction.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TransactionStatus {
    Approved,
    Declined,
    Pending,
    Refunded,
    Cancelled
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 5] = [
        TransactionStatus::Approved,
        TransactionStatus::Declined,
        TransactionStatus::Pending,
        TransactionStatus::Refunded,
        TransactionStatus::Cancelled
    ];

    /// Uppercase code used once a record has been standardized.
    pub fn code(&self) -> &'static str {
        match self {
            TransactionStatus::Approved => "APPROVED",
            TransactionStatus::Declined => "DECLINED",
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Refunded => "REFUNDED",
            TransactionStatus::Cancelled => "CANCELLED"
        }
    }

    /// Lowercase code as emitted by the upstream feed.
    pub fn feed_code(&self) -> &'static str {
        match self {
            TransactionStatus::Approved => "approved",
            TransactionStatus::Declined => "declined",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Refunded => "refunded",
            TransactionStatus::Cancelled => "cancelled"
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.code())
    }
}

impl FromStr for TransactionStatus {
    type Err = FieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        TransactionStatus::ALL.into_iter()
            .find(|status| status.code().eq_ignore_ascii_case(value))
            .ok_or_else(|| FieldError::InvalidStatus(value.to_string()))
    }
}
