use std::io;
use thiserror::Error;

use crate::domain::DomainError;
use crate::storage::StorageError;

/// IO-level errors for CSV parsing and report output
#[derive(Error, Debug)]
pub enum IoError {
    #[error("CSV async parsing error: {0}")]
    CsvAsync(#[from] csv_async::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid amount format: {0}")]
    InvalidAmount(String),

    #[error("Invalid timestamp (expected RFC 3339): {0}")]
    InvalidTimestamp(String),

    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Invalid transaction type: {0}")]
    InvalidTransactionKind(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
