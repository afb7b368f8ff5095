use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::io::AsyncWrite;

use super::error::StorageError;
use super::report::ReconciliationReport;
use super::traits::ResultAggregator;
use crate::domain::{AmountType, BankStatementRecord, DomainError, Transaction};

/// Shared reconciliation totals, safe to update from any number of tasks
///
/// Counters are atomics. The discrepancy total and each bank's bucket sit
/// behind their own mutex, held only for a single update.
pub struct ReconciliationResult<A: AmountType> {
    processed: AtomicU64,
    matched: AtomicU64,
    unmatched: AtomicU64,
    duplicates: AtomicU64,
    total_discrepancy: Mutex<A>,
    missing_transactions: DashMap<Arc<str>, Mutex<Vec<BankStatementRecord<A>>>>,
    missing_bank_statements: Mutex<Vec<Transaction<A>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Every critical section is a single push or add, so a poisoned lock still holds consistent data
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<A: AmountType> ReconciliationResult<A> {
    pub fn new() -> Self {
        Self {
            processed: AtomicU64::new(0),
            matched: AtomicU64::new(0),
            unmatched: AtomicU64::new(0),
            duplicates: AtomicU64::new(0),
            total_discrepancy: Mutex::new(A::zero()),
            missing_transactions: DashMap::new(),
            missing_bank_statements: Mutex::new(Vec::new()),
        }
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Acquire)
    }

    pub fn matched(&self) -> u64 {
        self.matched.load(Ordering::Acquire)
    }

    pub fn unmatched(&self) -> u64 {
        self.unmatched.load(Ordering::Acquire)
    }

    pub fn duplicates(&self) -> u64 {
        self.duplicates.load(Ordering::Acquire)
    }

    pub fn total_discrepancy(&self) -> A {
        *lock(&self.total_discrepancy)
    }

    pub fn is_bank_registered(&self, bank: &str) -> bool {
        self.missing_transactions.contains_key(bank)
    }
}

impl<A: AmountType> Default for ReconciliationResult<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<A: AmountType> ResultAggregator<A> for ReconciliationResult<A> {
    fn register_bank(&self, bank: &str) -> Arc<str> {
        match self.missing_transactions.entry(Arc::from(bank)) {
            Entry::Occupied(e) => e.key().clone(),
            Entry::Vacant(e) => {
                let name = e.key().clone();
                e.insert(Mutex::new(Vec::new()));
                name
            }
        }
    }

    fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::AcqRel);
    }

    fn record_match(&self, discrepancy: A) -> Result<(), StorageError> {
        {
            let mut total = lock(&self.total_discrepancy);
            *total = total
                .checked_add(discrepancy)
                .ok_or(DomainError::Overflow)?;
        }
        self.matched.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::AcqRel);
    }

    fn record_missing_transaction(
        &self,
        record: BankStatementRecord<A>,
    ) -> Result<(), StorageError> {
        let bucket = self
            .missing_transactions
            .get(&*record.bank)
            .ok_or_else(|| StorageError::UnregisteredBank(record.bank.to_string()))?;
        lock(bucket.value()).push(record);
        drop(bucket);

        self.unmatched.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn record_missing_bank_statements(&self, transactions: Vec<Transaction<A>>) {
        let count = transactions.len() as u64;
        lock(&self.missing_bank_statements).extend(transactions);
        self.unmatched.fetch_add(count, Ordering::AcqRel);
    }

    fn report(&self) -> ReconciliationReport<A> {
        let missing_transactions: BTreeMap<_, _> = self
            .missing_transactions
            .iter()
            .map(|entry| {
                let mut statements = lock(entry.value()).clone();
                statements.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
                (entry.key().to_string(), statements)
            })
            .collect();

        let mut missing_bank_statements = lock(&self.missing_bank_statements).clone();
        missing_bank_statements
            .sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

        ReconciliationReport {
            processed: self.processed(),
            matched: self.matched(),
            unmatched: self.unmatched(),
            duplicate_statements: self.duplicates(),
            total_discrepancy: self.total_discrepancy(),
            missing_bank_statements,
            missing_transactions,
        }
    }

    async fn snapshot<W>(&self, writer: W) -> Result<(), StorageError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.report().write_to(writer).await
    }
}
