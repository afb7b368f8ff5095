use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::error::ErrorPolicy;
use crate::domain::{AmountType, BankStatementRecord};
use crate::engine::EngineError;
use crate::io::{IoError, StatementLine};
use crate::storage::ResultAggregator;

/// Counts from ingesting one statement source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IngestSummary {
    pub bank: String,
    pub emitted: u64,
    pub rejected: u64,
}

/// Push one bank's statements onto the shared queue
///
/// The bank's unmatched bucket is registered before the first record is sent.
/// Sending waits while the queue is full.
pub async fn ingest_statements<A, S, R>(
    bank: &str,
    mut stream: S,
    queue: mpsc::Sender<BankStatementRecord<A>>,
    results: &R,
    policy: &dyn ErrorPolicy,
    cancel: &CancellationToken,
) -> Result<IngestSummary, EngineError>
where
    A: AmountType,
    S: Stream<Item = Result<StatementLine<A>, IoError>> + Unpin,
    R: ResultAggregator<A>,
{
    let bank_name = results.register_bank(bank);
    let mut summary = IngestSummary {
        bank: bank.to_string(),
        ..IngestSummary::default()
    };

    loop {
        let row = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(EngineError::Cancelled),
            row = stream.next() => row,
        };

        let line = match row {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                if !policy.handle_row_error(bank, &e) {
                    return Err(EngineError::Ingestion {
                        bank: bank.to_string(),
                        source: e,
                    });
                }
                summary.rejected += 1;
                continue;
            }
            None => break,
        };

        let record = line.into_record(bank_name.clone());
        debug!(id = %record.id, bank, "Queueing statement");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(EngineError::Cancelled),
            sent = queue.send(record) => {
                if sent.is_err() {
                    // Every worker has exited; the run is already failing
                    return Err(EngineError::Cancelled);
                }
            }
        }
        summary.emitted += 1;
    }

    info!(
        bank,
        emitted = summary.emitted,
        rejected = summary.rejected,
        "Statement source drained"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FixedPoint;
    use crate::storage::ReconciliationResult;
    use crate::streaming::error::{AbortOnError, SkipErrors};
    use chrono::NaiveDate;
    use futures::stream;

    fn line(id: &str) -> Result<StatementLine<FixedPoint>, IoError> {
        Ok(StatementLine {
            id: id.to_string(),
            amount: FixedPoint::from_raw(10_000),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        })
    }

    #[tokio::test]
    async fn registers_bank_and_tags_records() {
        let results = ReconciliationResult::new();
        let (tx, mut rx) = mpsc::channel(10);
        let cancel = CancellationToken::new();

        let summary = ingest_statements(
            "bca",
            stream::iter(vec![line("S1"), line("S2")]),
            tx,
            &results,
            &SkipErrors,
            &cancel,
        )
        .await
        .unwrap();

        assert_eq!(summary.emitted, 2);
        assert!(results.is_bank_registered("bca"));

        let first = rx.recv().await.unwrap();
        assert_eq!(first.id, "S1");
        assert_eq!(&*first.bank, "bca");
        assert_eq!(rx.recv().await.unwrap().id, "S2");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn empty_source_still_registers_bank() {
        let results = ReconciliationResult::<FixedPoint>::new();
        let (tx, _rx) = mpsc::channel(1);

        let summary = ingest_statements(
            "mandiri",
            stream::iter(Vec::<Result<StatementLine<FixedPoint>, IoError>>::new()),
            tx,
            &results,
            &SkipErrors,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.emitted, 0);
        assert!(results.is_bank_registered("mandiri"));
    }

    #[tokio::test]
    async fn skip_policy_drops_bad_rows() {
        let results = ReconciliationResult::new();
        let (tx, mut rx) = mpsc::channel(10);

        let rows = vec![
            line("S1"),
            Err(IoError::InvalidDate("x".to_string())),
            line("S2"),
        ];
        let summary = ingest_statements(
            "bca",
            stream::iter(rows),
            tx,
            &results,
            &SkipErrors,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.emitted, 2);
        assert_eq!(summary.rejected, 1);
        assert_eq!(rx.recv().await.unwrap().id, "S1");
        assert_eq!(rx.recv().await.unwrap().id, "S2");
    }

    #[tokio::test]
    async fn abort_policy_fails_the_source() {
        let results = ReconciliationResult::new();
        let (tx, _rx) = mpsc::channel(10);

        let rows = vec![line("S1"), Err(IoError::InvalidAmount("abc".to_string())), line("S2")];
        let result = ingest_statements(
            "bca",
            stream::iter(rows),
            tx,
            &results,
            &AbortOnError,
            &CancellationToken::new(),
        )
        .await;

        assert!(matches!(
            result,
            Err(EngineError::Ingestion { ref bank, source: IoError::InvalidAmount(_) }) if bank == "bca"
        ));
    }

    #[tokio::test]
    async fn cancellation_unblocks_a_full_queue() {
        let results = ReconciliationResult::new();
        let (tx, _rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();

        let rows = vec![line("S1"), line("S2"), line("S3")];
        let handle = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                ingest_statements("bca", stream::iter(rows), tx, &results, &SkipErrors, &cancel)
                    .await
            })
        };

        tokio::task::yield_now().await;
        cancel.cancel();

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(EngineError::Cancelled)));
    }
}
