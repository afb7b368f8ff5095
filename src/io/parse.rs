use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use super::error::IoError;
use crate::domain::{AmountType, BankStatementRecord, DomainError, Transaction, TransactionKind};

/// Ledger row as read from input, by column position: id, amount, type, timestamp
#[derive(Debug, Deserialize)]
pub struct RawTransactionRow {
    pub id: String,
    pub amount: String,
    pub kind: String,
    pub timestamp: String,
}

/// Bank statement row as read from input, by column position: id, amount, date
#[derive(Debug, Deserialize)]
pub struct RawStatementRow {
    pub id: String,
    pub amount: String,
    pub date: String,
}

/// Parsed statement row, not yet tagged with its bank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementLine<A: AmountType> {
    pub id: String,
    pub amount: A,
    pub date: NaiveDate,
}

impl<A: AmountType> StatementLine<A> {
    pub fn into_record(self, bank: Arc<str>) -> BankStatementRecord<A> {
        BankStatementRecord::new(self.id, self.amount, self.date, bank)
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, IoError> {
    let value = value.trim();
    if value.is_empty() {
        Err(IoError::MissingField(field))
    } else {
        Ok(value)
    }
}

fn parse_amount<A: AmountType>(value: &str) -> Result<A, IoError> {
    let value = required(value, "amount")?;
    A::from_decimal_str(value).map_err(|e| match e {
        DomainError::Overflow => IoError::Domain(e),
        _ => IoError::InvalidAmount(value.to_string()),
    })
}

impl RawTransactionRow {
    /// Parse this raw row into a ledger transaction
    pub fn parse<A: AmountType>(self) -> Result<Transaction<A>, IoError> {
        let id = required(&self.id, "id")?;
        let amount = parse_amount::<A>(&self.amount)?;

        let kind_str = required(&self.kind, "type")?;
        let kind: TransactionKind = kind_str
            .parse()
            .map_err(|_| IoError::InvalidTransactionKind(kind_str.to_string()))?;

        let ts_str = required(&self.timestamp, "timestamp")?;
        let timestamp = DateTime::parse_from_rfc3339(ts_str)
            .map_err(|_| IoError::InvalidTimestamp(ts_str.to_string()))?;

        Ok(Transaction::new(id, amount, kind, timestamp))
    }
}

impl RawStatementRow {
    /// Parse this raw row into a statement line
    pub fn parse<A: AmountType>(self) -> Result<StatementLine<A>, IoError> {
        let id = required(&self.id, "id")?;
        let amount = parse_amount::<A>(&self.amount)?;

        let date_str = required(&self.date, "date")?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| IoError::InvalidDate(date_str.to_string()))?;

        Ok(StatementLine {
            id: id.to_string(),
            amount,
            date,
        })
    }
}
