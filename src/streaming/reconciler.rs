use std::fmt;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use futures::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::error::{ErrorPolicy, SkipErrors};
use super::ingest::{IngestSummary, ingest_statements};
use super::loader::load_transactions;
use super::workers::spawn_workers;
use crate::domain::{AmountType, BankStatementRecord, ReconciliationWindow, Transaction};
use crate::engine::{EngineError, StatementMatcher};
use crate::io::{CsvStatementStream, CsvTransactionStream, IoError, StatementLine, StatementSource};
use crate::storage::{
    ConcurrentTransactionIndex, ReconciliationReport, ReconciliationResult, ResultAggregator,
    TransactionIndex,
};

/// Matching workers used when none is configured
pub const DEFAULT_WORKER_COUNT: usize = 5;

/// Shared queue capacity used when none is configured
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

type TransactionStream<A> = Pin<Box<dyn Stream<Item = Result<Transaction<A>, IoError>> + Send>>;
type StatementStream<A> = Pin<Box<dyn Stream<Item = Result<StatementLine<A>, IoError>> + Send>>;

enum Input<S> {
    File(PathBuf),
    Stream(S),
}

struct StatementInput<A: AmountType> {
    bank: String,
    input: Input<StatementStream<A>>,
}

/// Lifecycle of a reconciliation run; transitions are strictly sequential
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReconciliationState {
    Created,
    TransactionsLoaded,
    Reconciling,
    UnmatchedSwept,
    Reported,
}

impl fmt::Display for ReconciliationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::TransactionsLoaded => "transactions-loaded",
            Self::Reconciling => "reconciling",
            Self::UnmatchedSwept => "unmatched-swept",
            Self::Reported => "reported",
        };
        f.write_str(name)
    }
}

/// Reconciles one ledger against any number of bank statement sources
///
/// Each instance owns its own index and result aggregator, so separate runs
/// never share mutable state.
///
/// # Example
/// ```rust,ignore
/// let report = Reconciliation::<FixedPoint>::new(window)
///     .with_transaction_file("transactions.csv")
///     .add_statement_file("bca.csv")
///     .add_statement_file("mandiri.csv")
///     .run()
///     .await?;
/// ```
pub struct Reconciliation<A: AmountType + 'static> {
    window: ReconciliationWindow,
    transactions: Option<Input<TransactionStream<A>>>,
    statements: Vec<StatementInput<A>>,
    worker_count: usize,
    queue_capacity: usize,
    statement_policy: Arc<dyn ErrorPolicy>,
    cancel: CancellationToken,
    state: ReconciliationState,
}

impl<A: AmountType + 'static> Reconciliation<A> {
    pub fn new(window: ReconciliationWindow) -> Self {
        Self {
            window,
            transactions: None,
            statements: Vec::new(),
            worker_count: DEFAULT_WORKER_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            statement_policy: Arc::new(SkipErrors),
            cancel: CancellationToken::new(),
            state: ReconciliationState::Created,
        }
    }

    /// Read ledger transactions from a CSV file
    pub fn with_transaction_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.transactions = Some(Input::File(path.into()));
        self
    }

    /// Read ledger transactions from an already-parsed stream
    pub fn with_transaction_stream<S>(mut self, stream: S) -> Self
    where
        S: Stream<Item = Result<Transaction<A>, IoError>> + Send + 'static,
    {
        self.transactions = Some(Input::Stream(Box::pin(stream)));
        self
    }

    /// Add a bank statement CSV file; the bank name comes from the file name
    pub fn add_statement_file(mut self, path: impl Into<PathBuf>) -> Self {
        let source = StatementSource::from_path(path);
        self.statements.push(StatementInput {
            bank: source.bank,
            input: Input::File(source.path),
        });
        self
    }

    /// Add an already-parsed statement stream for `bank`
    pub fn add_statement_stream<S>(mut self, bank: impl Into<String>, stream: S) -> Self
    where
        S: Stream<Item = Result<StatementLine<A>, IoError>> + Send + 'static,
    {
        self.statements.push(StatementInput {
            bank: bank.into(),
            input: Input::Stream(Box::pin(stream)),
        });
        self
    }

    /// Number of matching workers (at least one)
    pub fn with_workers(mut self, count: usize) -> Self {
        self.worker_count = count.max(1);
        self
    }

    /// Capacity of the shared statement queue (at least one)
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// How malformed statement rows are handled (defaults to [`SkipErrors`])
    pub fn with_statement_policy<P>(mut self, policy: P) -> Self
    where
        P: ErrorPolicy + 'static,
    {
        self.statement_policy = Arc::new(policy);
        self
    }

    /// Stop the run when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn state(&self) -> ReconciliationState {
        self.state
    }

    fn advance(&mut self, next: ReconciliationState) {
        debug_assert!(next > self.state, "state must move forward");
        info!(from = %self.state, to = %next, "Reconciliation state change");
        self.state = next;
    }

    /// Run the full reconciliation and return the report
    ///
    /// Any failure aborts the whole run; no partial report is produced.
    pub async fn run(mut self) -> Result<ReconciliationReport<A>, EngineError> {
        let index = Arc::new(ConcurrentTransactionIndex::<A>::new());
        let results = Arc::new(ReconciliationResult::<A>::new());

        let transactions = self.open_transactions().await?;
        load_transactions(transactions, &self.window, &*index, &*results, &SkipErrors).await?;
        self.advance(ReconciliationState::TransactionsLoaded);

        self.advance(ReconciliationState::Reconciling);
        self.reconcile(Arc::clone(&index), Arc::clone(&results))
            .await?;

        let unmatched = index.unmatched_in(&self.window);
        info!(count = unmatched.len(), "Transactions without a bank statement");
        results.record_missing_bank_statements(unmatched);
        self.advance(ReconciliationState::UnmatchedSwept);

        let report = results.report();
        self.advance(ReconciliationState::Reported);
        Ok(report)
    }

    async fn open_transactions(&mut self) -> Result<TransactionStream<A>, EngineError> {
        match self.transactions.take() {
            Some(Input::Stream(stream)) => Ok(stream),
            Some(Input::File(path)) => {
                let stream = CsvTransactionStream::<A>::from_file(&path)
                    .await
                    .map_err(EngineError::Loading)?;
                Ok(Box::pin(stream))
            }
            None => Ok(Box::pin(futures::stream::empty())),
        }
    }

    /// Run producers and workers concurrently over one bounded queue
    ///
    /// The queue closes only once every producer has finished, so workers may
    /// start consuming early but never stop before all statements are queued.
    async fn reconcile(
        &mut self,
        index: Arc<ConcurrentTransactionIndex<A>>,
        results: Arc<ReconciliationResult<A>>,
    ) -> Result<(), EngineError> {
        let cancel = self.cancel.child_token();
        let (queue_tx, queue_rx) = mpsc::channel(self.queue_capacity);

        let matcher = StatementMatcher::new(index, Arc::clone(&results), self.window);
        let workers = spawn_workers(self.worker_count, matcher, queue_rx, cancel.clone());

        let producers: Vec<_> = std::mem::take(&mut self.statements)
            .into_iter()
            .map(|source| {
                spawn_producer(
                    source,
                    queue_tx.clone(),
                    Arc::clone(&results),
                    Arc::clone(&self.statement_policy),
                    cancel.clone(),
                )
            })
            .collect();

        // Producers hold the only remaining senders
        drop(queue_tx);

        let mut failure: Option<EngineError> = None;
        for producer in producers {
            match producer.await {
                Ok(Ok(summary)) => {
                    info!(bank = %summary.bank, emitted = summary.emitted, rejected = summary.rejected, "Producer finished");
                }
                Ok(Err(e)) => record_failure(&mut failure, e, &cancel),
                Err(e) => record_failure(&mut failure, e.into(), &cancel),
            }
        }

        for worker in workers {
            match worker.await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => record_failure(&mut failure, e, &cancel),
                Err(e) => record_failure(&mut failure, e.into(), &cancel),
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn spawn_producer<A>(
    source: StatementInput<A>,
    queue: mpsc::Sender<BankStatementRecord<A>>,
    results: Arc<ReconciliationResult<A>>,
    policy: Arc<dyn ErrorPolicy>,
    cancel: CancellationToken,
) -> JoinHandle<Result<IngestSummary, EngineError>>
where
    A: AmountType + 'static,
{
    tokio::spawn(async move {
        let StatementInput { bank, input } = source;

        let stream: StatementStream<A> = match input {
            Input::Stream(stream) => stream,
            Input::File(path) => match CsvStatementStream::<A>::from_file(&path).await {
                Ok(stream) => Box::pin(stream),
                Err(e) => {
                    cancel.cancel();
                    return Err(EngineError::Ingestion { bank, source: e });
                }
            },
        };

        let outcome =
            ingest_statements(&bank, stream, queue, &*results, &*policy, &cancel).await;
        if outcome.is_err() {
            cancel.cancel();
        }
        outcome
    })
}

/// Keep the first real failure; cancellations are only a consequence of it
fn record_failure(slot: &mut Option<EngineError>, error: EngineError, cancel: &CancellationToken) {
    cancel.cancel();
    let is_cancel = matches!(error, EngineError::Cancelled);
    match slot.as_ref() {
        None => *slot = Some(error),
        Some(EngineError::Cancelled) if !is_cancel => *slot = Some(error),
        Some(_) if !is_cancel => warn!(%error, "Additional failure during reconciliation"),
        Some(_) => {}
    }
}
