use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use super::error::StorageError;
use super::report::ReconciliationReport;
use crate::domain::{AmountType, BankStatementRecord, ReconciliationWindow, Transaction};

/// Outcome of looking up a statement id in the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome<A: AmountType> {
    /// First statement for this id; carries a copy of the now-matched transaction
    Matched(Transaction<A>),
    /// The transaction was already claimed by an earlier statement
    AlreadyMatched,
    /// No transaction with this id
    Missing,
}

/// Index of ledger transactions keyed by transaction id
///
/// The key set is only written during loading. While matching, the sole
/// mutation is flipping an entry's matched flag.
pub trait TransactionIndex<A: AmountType>: Send + Sync {
    /// Insert a transaction, returning the entry it replaced (last write wins)
    fn insert(&self, transaction: Transaction<A>) -> Option<Transaction<A>>;

    /// Atomically claim the transaction with this id for a statement
    fn try_match(&self, id: &str) -> MatchOutcome<A>;

    /// Transactions in the window that no statement matched
    fn unmatched_in(&self, window: &ReconciliationWindow) -> Vec<Transaction<A>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Concurrency-safe accumulator for reconciliation outcomes
#[async_trait]
pub trait ResultAggregator<A: AmountType>: Send + Sync {
    /// Create the unmatched-statement bucket for a bank and return its shared name
    fn register_bank(&self, bank: &str) -> Arc<str>;

    /// Count one accepted record (ledger row or in-window statement)
    fn record_processed(&self);

    /// Count a match and add its discrepancy to the running total
    fn record_match(&self, discrepancy: A) -> Result<(), StorageError>;

    /// Count a statement whose transaction was already matched
    fn record_duplicate(&self);

    /// File a statement with no ledger counterpart under its bank
    fn record_missing_transaction(
        &self,
        record: BankStatementRecord<A>,
    ) -> Result<(), StorageError>;

    /// Store the transactions that no statement matched
    fn record_missing_bank_statements(&self, transactions: Vec<Transaction<A>>);

    /// Ordered, immutable view of the current totals
    fn report(&self) -> ReconciliationReport<A>;

    /// Write the human-readable summary to a writer
    async fn snapshot<W>(&self, writer: W) -> Result<(), StorageError>
    where
        W: AsyncWrite + Unpin + Send;
}
