use std::io;
use thiserror::Error;

use crate::domain::DomainError;

/// Storage-level errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Bank {0} was not registered before its statements were recorded")]
    UnregisteredBank(String),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Domain error: {0}")]
    DomainError(#[from] DomainError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        assert_eq!(
            StorageError::UnregisteredBank("bca".to_string()).to_string(),
            "Bank bca was not registered before its statements were recorded"
        );

        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        assert!(StorageError::from(io_err).to_string().contains("I/O error"));
    }

    #[test]
    fn domain_error_conversion() {
        match StorageError::from(DomainError::Overflow) {
            StorageError::DomainError(DomainError::Overflow) => {}
            other => panic!("Expected DomainError variant, got {other:?}"),
        }
    }
}
