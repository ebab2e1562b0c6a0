use std::str::FromStr;

use rust_decimal::Decimal;

use crate::types::errors::FieldError;
use crate::types::is_null;

/// Coerces a raw amount cell into a decimal.
///
/// Accepts plain decimals (`12.50`, `-3`, `+7.1`) and scientific notation (`1.5e3`).
/// Anything else, including null tokens, is rejected so the row can be dropped.
pub fn parse_amount(value: &str) -> Result<Decimal, FieldError> {
    if is_null(value) {
        return Err(FieldError::Null);
    }

    let value = value.trim();

    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map(|amount| amount.normalize())
        .map_err(|_| FieldError::InvalidAmount(value.to_string()))
}
