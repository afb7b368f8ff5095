use std::sync::Arc;

use chrono::NaiveDate;

use super::amount::AmountType;

/// One row of a bank statement, tagged with the bank it came from
///
/// Immutable once created; handed from an ingestion task to exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankStatementRecord<A: AmountType> {
    pub id: String,
    pub amount: A,
    pub date: NaiveDate,
    pub bank: Arc<str>,
}

impl<A: AmountType> BankStatementRecord<A> {
    pub fn new(id: impl Into<String>, amount: A, date: NaiveDate, bank: Arc<str>) -> Self {
        Self {
            id: id.into(),
            amount,
            date,
            bank,
        }
    }
}
