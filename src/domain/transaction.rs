use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};

use super::amount::AmountType;
use super::error::DomainError;

/// Direction of a ledger transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    /// Express a ledger amount in the bank's sign convention
    ///
    /// Bank statements record credits as positive inflows while the ledger
    /// records them with the opposite sign, so credits are negated.
    pub fn sign_adjusted<A: AmountType>(&self, amount: A) -> Result<A, DomainError> {
        match self {
            Self::Credit => amount.checked_neg().ok_or(DomainError::Overflow),
            Self::Debit => Ok(amount),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "CREDIT",
            Self::Debit => "DEBIT",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREDIT" => Ok(Self::Credit),
            "DEBIT" => Ok(Self::Debit),
            _ => Err(DomainError::InvalidTransactionKind(s.to_string())),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal ledger transaction
///
/// Owned by the transaction index for the whole run. The only field that
/// changes after loading is `matched`, and it only ever flips from false to true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction<A: AmountType> {
    pub id: String,
    pub amount: A,
    pub kind: TransactionKind,
    pub timestamp: DateTime<FixedOffset>,
    matched: bool,
}

impl<A: AmountType> Transaction<A> {
    /// Create a new, unmatched transaction
    pub fn new(
        id: impl Into<String>,
        amount: A,
        kind: TransactionKind,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            kind,
            timestamp,
            matched: false,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// Mark as matched. Returns false if it was already matched.
    pub fn mark_matched(&mut self) -> bool {
        !std::mem::replace(&mut self.matched, true)
    }

    /// Amount in the bank's sign convention
    pub fn signed_amount(&self) -> Result<A, DomainError> {
        self.kind.sign_adjusted(self.amount)
    }
}
