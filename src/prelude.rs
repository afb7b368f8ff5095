//! Prelude module for convenient imports
//!
//! Import everything you need with: `use recon::prelude::*;`

// Domain types
pub use crate::domain::{
    AmountType, BankStatementRecord, DomainError, FixedPoint, ReconciliationWindow, Transaction,
    TransactionKind,
};

// Storage types
pub use crate::storage::{
    ConcurrentTransactionIndex, MatchOutcome, ReconciliationReport, ReconciliationResult,
    ResultAggregator, StorageError, TransactionIndex,
};

// Engine types
pub use crate::engine::{Classification, EngineError, StatementMatcher};

// IO types
pub use crate::io::{
    CsvStatementStream, CsvTransactionStream, IoError, StatementLine, StatementSource,
    bank_name_from_path, write_report,
};

// Streaming types
pub use crate::streaming::{
    AbortOnError, ErrorPolicy, Reconciliation, ReconciliationState, SilentSkip, SkipErrors,
};

// App types
pub use crate::app::{AppError, CliApp, CliArgs, ReconConfig, StatementErrorMode, Writers};
