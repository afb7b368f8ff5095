use thiserror::Error;

use crate::domain::DomainError;
use crate::io::IoError;
use crate::storage::StorageError;

/// Engine-level errors for a reconciliation run
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Statement ingestion for bank {bank} failed: {source}")]
    Ingestion {
        bank: String,
        #[source]
        source: IoError,
    },

    #[error("Transaction loading failed: {0}")]
    Loading(#[source] IoError),

    #[error("Reconciliation task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    #[error("Reconciliation cancelled")]
    Cancelled,

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
