use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use csv_async::{AsyncReaderBuilder, StringRecord};
use futures::io::AsyncRead;
use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use tokio::fs::File;
use tokio_util::compat::TokioAsyncReadCompatExt;

use super::error::IoError;
use super::parse::{RawStatementRow, RawTransactionRow, StatementLine};
use crate::domain::{AmountType, Transaction};

type RowStream<T> = Pin<Box<dyn Stream<Item = Result<T, IoError>> + Send>>;

/// Read rows by position after skipping the header, then hand each to `parse`
fn positional_rows<R, Raw, T, F>(reader: R, parse: F) -> RowStream<T>
where
    R: AsyncRead + Unpin + Send + 'static,
    Raw: DeserializeOwned,
    T: Send + 'static,
    F: Fn(Raw) -> Result<T, IoError> + Send + 'static,
{
    let csv_reader = AsyncReaderBuilder::new()
        .has_headers(true)
        .trim(csv_async::Trim::All)
        .flexible(true)
        .create_reader(reader);

    let stream = csv_reader.into_records().map(move |result| {
        result
            .and_then(|record: StringRecord| record.deserialize::<Raw>(None))
            .map_err(IoError::from)
            .and_then(&parse)
    });

    Box::pin(stream)
}

/// Async stream of ledger transactions from CSV input
pub struct CsvTransactionStream<A>
where
    A: AmountType + 'static,
{
    inner: RowStream<Transaction<A>>,
}

impl<A> CsvTransactionStream<A>
where
    A: AmountType + 'static,
{
    /// Create a new transaction stream from an async reader
    pub fn new<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        Self {
            inner: positional_rows(reader, RawTransactionRow::parse::<A>),
        }
    }

    /// Open a transaction file and stream its rows
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let file = File::open(path.as_ref()).await?;
        Ok(Self::new(file.compat()))
    }
}

impl<A> Stream for CsvTransactionStream<A>
where
    A: AmountType + 'static,
{
    type Item = Result<Transaction<A>, IoError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Async stream of bank statement lines from CSV input
pub struct CsvStatementStream<A>
where
    A: AmountType + 'static,
{
    inner: RowStream<StatementLine<A>>,
}

impl<A> CsvStatementStream<A>
where
    A: AmountType + 'static,
{
    /// Create a new statement stream from an async reader
    pub fn new<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        Self {
            inner: positional_rows(reader, RawStatementRow::parse::<A>),
        }
    }

    /// Open a statement file and stream its rows
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let file = File::open(path.as_ref()).await?;
        Ok(Self::new(file.compat()))
    }
}

impl<A> Stream for CsvStatementStream<A>
where
    A: AmountType + 'static,
{
    type Item = Result<StatementLine<A>, IoError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FixedPoint, TransactionKind};
    use chrono::NaiveDate;
    use futures::io::Cursor;

    fn reader(data: &str) -> Cursor<Vec<u8>> {
        Cursor::new(data.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn reads_transactions_by_position() {
        let csv_data = "\
trxID,amount,type,transactionTime
T1,100.00,DEBIT,2024-01-05T10:00:00+07:00
T2,25.50,CREDIT,2024-01-06T08:15:00+07:00
";
        let mut stream = CsvTransactionStream::<FixedPoint>::new(reader(csv_data));

        let tx1 = stream.next().await.unwrap().unwrap();
        assert_eq!(tx1.id, "T1");
        assert_eq!(tx1.amount, FixedPoint::from_raw(1_000_000));
        assert_eq!(tx1.kind, TransactionKind::Debit);

        let tx2 = stream.next().await.unwrap().unwrap();
        assert_eq!(tx2.id, "T2");
        assert_eq!(tx2.amount, FixedPoint::from_raw(255_000));
        assert_eq!(tx2.kind, TransactionKind::Credit);

        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn header_names_do_not_matter() {
        let csv_data = "\
a,b,c
S1,10,2024-01-05
";
        let mut stream = CsvStatementStream::<FixedPoint>::new(reader(csv_data));

        let line = stream.next().await.unwrap().unwrap();
        assert_eq!(line.id, "S1");
        assert_eq!(line.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn handles_whitespace() {
        let csv_data = "\
unique_identifier,amount,date
  S1  ,  1.5000  ,  2024-01-05
";
        let mut stream = CsvStatementStream::<FixedPoint>::new(reader(csv_data));

        let line = stream.next().await.unwrap().unwrap();
        assert_eq!(line.id, "S1");
        assert_eq!(line.amount, FixedPoint::from_raw(15_000));
    }

    #[tokio::test]
    async fn bad_rows_do_not_end_the_stream() {
        let csv_data = "\
unique_identifier,amount,date
S1,abc,2024-01-05
S2,1.00,not-a-date
S3
S4,2.00,2024-01-07
";
        let results: Vec<_> = CsvStatementStream::<FixedPoint>::new(reader(csv_data))
            .collect()
            .await;

        assert_eq!(results.len(), 4);
        assert!(matches!(results[0], Err(IoError::InvalidAmount(_))));
        assert!(matches!(results[1], Err(IoError::InvalidDate(_))));
        assert!(results[2].is_err());
        assert_eq!(results[3].as_ref().unwrap().id, "S4");
    }

    #[tokio::test]
    async fn handles_empty_csv() {
        let csv_data = "trxID,amount,type,transactionTime\n";
        let mut stream = CsvTransactionStream::<FixedPoint>::new(reader(csv_data));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn from_file_reports_missing_file() {
        let result = CsvTransactionStream::<FixedPoint>::from_file("/nonexistent/ledger.csv").await;
        assert!(matches!(result, Err(IoError::Io(_))));
    }
}
