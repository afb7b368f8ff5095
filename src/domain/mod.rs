pub mod amount;
pub mod error;
pub mod statement;
pub mod transaction;
pub mod window;

// Re-export commonly used types
pub use amount::{AmountType, FixedPoint};
pub use error::DomainError;
pub use statement::BankStatementRecord;
pub use transaction::{Transaction, TransactionKind};
pub use window::ReconciliationWindow;
