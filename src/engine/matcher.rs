use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, warn};

use super::error::EngineError;
use crate::domain::{AmountType, BankStatementRecord, DomainError, ReconciliationWindow};
use crate::storage::{MatchOutcome, ResultAggregator, TransactionIndex};

/// How a single bank statement was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<A: AmountType> {
    /// Dated outside the reconciliation window; not counted
    OutOfWindow,
    /// Claimed a ledger transaction
    Matched { discrepancy: A },
    /// Its ledger transaction was already claimed by another statement
    Duplicate,
    /// No ledger transaction with this id
    MissingTransaction,
}

/// Classifies bank statements against the transaction index and records the outcome
pub struct StatementMatcher<A, I, R>
where
    A: AmountType,
    I: TransactionIndex<A>,
    R: ResultAggregator<A>,
{
    index: Arc<I>,
    results: Arc<R>,
    window: ReconciliationWindow,
    _phantom: PhantomData<A>,
}

impl<A, I, R> Clone for StatementMatcher<A, I, R>
where
    A: AmountType,
    I: TransactionIndex<A>,
    R: ResultAggregator<A>,
{
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
            results: Arc::clone(&self.results),
            window: self.window,
            _phantom: PhantomData,
        }
    }
}

impl<A, I, R> StatementMatcher<A, I, R>
where
    A: AmountType,
    I: TransactionIndex<A>,
    R: ResultAggregator<A>,
{
    pub fn new(index: Arc<I>, results: Arc<R>, window: ReconciliationWindow) -> Self {
        Self {
            index,
            results,
            window,
            _phantom: PhantomData,
        }
    }

    /// Classify one statement and record the outcome
    pub fn classify(
        &self,
        statement: BankStatementRecord<A>,
    ) -> Result<Classification<A>, EngineError> {
        if !self.window.contains_date(statement.date) {
            debug!(id = %statement.id, bank = %statement.bank, date = %statement.date, "Statement outside window");
            return Ok(Classification::OutOfWindow);
        }

        self.results.record_processed();

        match self.index.try_match(&statement.id) {
            MatchOutcome::Matched(transaction) => {
                let discrepancy = transaction
                    .signed_amount()?
                    .abs_diff(statement.amount)
                    .ok_or(DomainError::Overflow)?;
                self.results.record_match(discrepancy)?;

                debug!(
                    id = %statement.id,
                    bank = %statement.bank,
                    discrepancy = %discrepancy.to_decimal_string(),
                    "Statement matched"
                );
                Ok(Classification::Matched { discrepancy })
            }
            MatchOutcome::AlreadyMatched => {
                warn!(id = %statement.id, bank = %statement.bank, "Duplicate statement for an already matched transaction");
                self.results.record_duplicate();
                Ok(Classification::Duplicate)
            }
            MatchOutcome::Missing => {
                debug!(id = %statement.id, bank = %statement.bank, "No system transaction for statement");
                self.results.record_missing_transaction(statement)?;
                Ok(Classification::MissingTransaction)
            }
        }
    }
}
