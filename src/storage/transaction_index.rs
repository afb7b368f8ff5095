use dashmap::DashMap;

use super::traits::{MatchOutcome, TransactionIndex};
use crate::domain::{AmountType, ReconciliationWindow, Transaction};

/// DashMap-backed transaction index
///
/// Matching goes through `get_mut`, which holds the entry's shard lock for the
/// check-and-set, so no two workers can claim the same id.
pub struct ConcurrentTransactionIndex<A: AmountType> {
    transactions: DashMap<String, Transaction<A>>,
}

impl<A: AmountType> ConcurrentTransactionIndex<A> {
    pub fn new() -> Self {
        Self {
            transactions: DashMap::new(),
        }
    }
}

impl<A: AmountType> Default for ConcurrentTransactionIndex<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: AmountType> TransactionIndex<A> for ConcurrentTransactionIndex<A> {
    fn insert(&self, transaction: Transaction<A>) -> Option<Transaction<A>> {
        self.transactions.insert(transaction.id.clone(), transaction)
    }

    fn try_match(&self, id: &str) -> MatchOutcome<A> {
        match self.transactions.get_mut(id) {
            Some(mut entry) => {
                if entry.mark_matched() {
                    MatchOutcome::Matched(entry.clone())
                } else {
                    MatchOutcome::AlreadyMatched
                }
            }
            None => MatchOutcome::Missing,
        }
    }

    fn unmatched_in(&self, window: &ReconciliationWindow) -> Vec<Transaction<A>> {
        let mut unmatched: Vec<_> = self
            .transactions
            .iter()
            .filter(|entry| !entry.is_matched() && window.contains_instant(&entry.timestamp))
            .map(|entry| entry.value().clone())
            .collect();

        unmatched.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        unmatched
    }

    fn len(&self) -> usize {
        self.transactions.len()
    }
}
