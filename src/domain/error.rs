use thiserror::Error;

/// Domain-level errors for values that cannot take part in a reconciliation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Invalid transaction type: {0}")]
    InvalidTransactionKind(String),

    #[error("Invalid reconciliation window: end {end} is before start {start}")]
    InvalidWindow { start: String, end: String },
}
