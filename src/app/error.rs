use std::io;
use thiserror::Error;

use crate::domain::DomainError;
use crate::engine::EngineError;
use crate::io::IoError;
use crate::storage::StorageError;

/// Top-level application errors unifying all layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV IO error: {0}")]
    CsvIo(#[from] IoError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Not a CSV file: {0}")]
    NotCsv(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Invalid configuration {key}: {value}")]
    InvalidConfig { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        assert_eq!(
            AppError::FileNotFound("input.csv".to_string()).to_string(),
            "File not found: input.csv"
        );
        assert_eq!(
            AppError::NotCsv("input.txt".to_string()).to_string(),
            "Not a CSV file: input.txt"
        );
        assert_eq!(
            AppError::InvalidConfig {
                key: "RECON_WORKERS",
                value: "many".to_string()
            }
            .to_string(),
            "Invalid configuration RECON_WORKERS: many"
        );
    }

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");

        match AppError::from(io_err) {
            AppError::Io(_) => {}
            other => panic!("Expected Io error variant, got {other:?}"),
        }
    }

    #[test]
    fn domain_error_conversion() {
        match AppError::from(DomainError::Overflow) {
            AppError::Domain(DomainError::Overflow) => {}
            other => panic!("Expected Domain error variant, got {other:?}"),
        }
    }

    #[test]
    fn engine_error_conversion() {
        match AppError::from(EngineError::Cancelled) {
            AppError::Engine(EngineError::Cancelled) => {}
            other => panic!("Expected Engine error variant, got {other:?}"),
        }
    }
}
