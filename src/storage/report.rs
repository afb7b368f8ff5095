use std::collections::BTreeMap;
use std::fmt::Write as _;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::error::StorageError;
use crate::domain::{AmountType, BankStatementRecord, Transaction};

/// Final, ordered outcome of a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationReport<A: AmountType> {
    /// Accepted ledger rows plus in-window statements
    pub processed: u64,
    pub matched: u64,
    /// Missing bank statements plus missing system transactions
    pub unmatched: u64,
    pub duplicate_statements: u64,
    pub total_discrepancy: A,
    /// Ledger transactions no statement matched, by timestamp then id
    pub missing_bank_statements: Vec<Transaction<A>>,
    /// Statements with no ledger counterpart, by bank then date then id
    pub missing_transactions: BTreeMap<String, Vec<BankStatementRecord<A>>>,
}

impl<A: AmountType> ReconciliationReport<A> {
    /// Number of statements filed as missing a system transaction
    pub fn missing_transaction_count(&self) -> usize {
        self.missing_transactions.values().map(Vec::len).sum()
    }

    /// Write the rendered summary and flush
    pub async fn write_to<W>(&self, mut writer: W) -> Result<(), StorageError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        writer.write_all(self.render().as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Human-readable summary
    pub fn render(&self) -> String {
        let mut out = String::new();

        // Writing into a String cannot fail
        let _ = self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "Total number of transactions processed : {}", self.processed)?;
        writeln!(out, "Total number of matched transactions   : {}", self.matched)?;
        writeln!(out, "Total number of unmatched transactions : {}", self.unmatched)?;
        writeln!(out, "    Details of unmatched transactions  :")?;

        writeln!(out, "        System transaction details (missing bank statements):")?;
        if self.missing_bank_statements.is_empty() {
            writeln!(out, "          (none)")?;
        }
        for tx in &self.missing_bank_statements {
            writeln!(out, "          - TrxID : {}", tx.id)?;
            writeln!(out, "            Amount: {}", tx.amount.to_rounded_string(2))?;
            writeln!(out, "            Type  : {}", tx.kind)?;
            writeln!(
                out,
                "            Time  : {}",
                tx.timestamp.format("%Y-%m-%d %H:%M:%S %:z")
            )?;
        }

        writeln!(out, "        Bank statement details (missing system transactions):")?;
        if self.missing_transactions.is_empty() {
            writeln!(out, "          (none)")?;
        }
        for (bank, statements) in &self.missing_transactions {
            writeln!(out, "            BANK {bank}:")?;
            if statements.is_empty() {
                writeln!(out, "              (none)")?;
            }
            for statement in statements {
                writeln!(out, "              - ID    : {}", statement.id)?;
                writeln!(
                    out,
                    "                Amount: {}",
                    statement.amount.to_rounded_string(2)
                )?;
                writeln!(out, "                Date  : {}", statement.date.format("%Y-%m-%d"))?;
            }
        }

        if self.duplicate_statements > 0 {
            writeln!(
                out,
                "Duplicate bank statements ignored      : {}",
                self.duplicate_statements
            )?;
        }
        writeln!(
            out,
            "Total discrepancies: {}",
            self.total_discrepancy.to_rounded_string(2)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FixedPoint, TransactionKind};
    use chrono::{DateTime, NaiveDate};
    use std::sync::Arc;

    fn empty() -> ReconciliationReport<FixedPoint> {
        ReconciliationReport {
            processed: 0,
            matched: 0,
            unmatched: 0,
            duplicate_statements: 0,
            total_discrepancy: FixedPoint::zero(),
            missing_bank_statements: Vec::new(),
            missing_transactions: BTreeMap::new(),
        }
    }

    #[test]
    fn renders_empty_report() {
        let text = empty().render();
        assert!(text.contains("Total number of transactions processed : 0"));
        assert!(text.contains("Total number of matched transactions   : 0"));
        assert!(text.contains("(none)"));
        assert!(text.ends_with("Total discrepancies: 0.00\n"));
        assert!(!text.contains("Duplicate"));
    }

    #[test]
    fn renders_itemised_sections() {
        let bank: Arc<str> = Arc::from("bca");
        let mut report = empty();
        report.processed = 5;
        report.matched = 2;
        report.unmatched = 2;
        report.duplicate_statements = 1;
        report.total_discrepancy = FixedPoint::from_raw(1_950_000);
        report.missing_bank_statements.push(Transaction::new(
            "T9",
            FixedPoint::from_raw(125_000),
            TransactionKind::Credit,
            DateTime::parse_from_rfc3339("2024-01-05T10:30:00+07:00").unwrap(),
        ));
        report.missing_transactions.insert(
            "bca".to_string(),
            vec![BankStatementRecord::new(
                "S7",
                FixedPoint::from_raw(42_000),
                NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
                bank,
            )],
        );

        let text = report.render();
        assert!(text.contains("Total number of matched transactions   : 2"));
        assert!(text.contains("- TrxID : T9"));
        assert!(text.contains("Amount: 12.50"));
        assert!(text.contains("Type  : CREDIT"));
        assert!(text.contains("Time  : 2024-01-05 10:30:00 +07:00"));
        assert!(text.contains("BANK bca:"));
        assert!(text.contains("- ID    : S7"));
        assert!(text.contains("Amount: 4.20"));
        assert!(text.contains("Date  : 2024-01-06"));
        assert!(text.contains("Duplicate bank statements ignored      : 1"));
        assert!(text.ends_with("Total discrepancies: 195.00\n"));
        assert_eq!(report.missing_transaction_count(), 1);
    }
}
