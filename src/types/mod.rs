mod amount;
mod errors;
mod status;
mod timestamp;

pub use amount::parse_amount;
pub use errors::FieldError;
pub use status::TransactionStatus;
pub use timestamp::{format_timestamp, parse_timestamp};

/// Tokens that a delimited source uses to spell a missing value.
const NULL_TOKENS: [&str; 10] = ["NA", "N/A", "#N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "<NA>"];

/// Returns `true` when a raw cell should be treated as a missing value.
pub fn is_null(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || NULL_TOKENS.contains(&value)
}

/// Text standardization applied to every string field: trim and uppercase.
pub fn standardize(value: &str) -> String {
    value.trim().to_uppercase()
}
