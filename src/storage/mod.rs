pub mod error;
pub mod report;
pub mod result;
pub mod traits;
pub mod transaction_index;

// Re-export commonly used types
pub use error::StorageError;
pub use report::ReconciliationReport;
pub use result::ReconciliationResult;
pub use traits::{MatchOutcome, ResultAggregator, TransactionIndex};
pub use transaction_index::ConcurrentTransactionIndex;
