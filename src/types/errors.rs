use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("Field error: value is null")]
    Null,
    #[error("Field error: invalid amount [{0}]")]
    InvalidAmount(String),
    #[error("Field error: invalid status [{0}]")]
    InvalidStatus(String),
    #[error("Field error: invalid timestamp [{0}]")]
    InvalidTimestamp(String)
}
