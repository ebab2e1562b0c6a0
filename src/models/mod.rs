mod batch;
mod transaction;

pub use batch::{BatchCapabilities, CleanedBatch, RawBatch};
pub use transaction::TransactionRecord;

/// Fields every record must carry, in canonical output order.
pub const CRITICAL_FIELDS: [&str; 9] = [
    "transaction_id",
    "user_id",
    "merchant_id",
    "amount",
    "currency",
    "status",
    "timestamp",
    "payment_method",
    "country"
];

pub const SECURITY_CODE: &str = "security_code";
pub const MERCHANT_COUNTRY: &str = "merchant_country";
