use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::{AmountType, BankStatementRecord};
use crate::engine::{Classification, EngineError, StatementMatcher};
use crate::storage::{ResultAggregator, TransactionIndex};

/// Per-worker classification counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    pub worker_id: usize,
    pub out_of_window: u64,
    pub matched: u64,
    pub duplicates: u64,
    pub missing: u64,
}

impl WorkerSummary {
    fn count(&mut self, classification: &Classification<impl AmountType>) {
        match classification {
            Classification::OutOfWindow => self.out_of_window += 1,
            Classification::Matched { .. } => self.matched += 1,
            Classification::Duplicate => self.duplicates += 1,
            Classification::MissingTransaction => self.missing += 1,
        }
    }
}

/// Spawn a fixed pool of workers draining the shared queue
///
/// Workers share the receiver and exit once every sender has been dropped and
/// the queue is empty. On error a worker cancels `cancel` so the rest of the run
/// stops instead of waiting on a queue nobody drains.
pub fn spawn_workers<A, I, R>(
    count: usize,
    matcher: StatementMatcher<A, I, R>,
    queue: mpsc::Receiver<BankStatementRecord<A>>,
    cancel: CancellationToken,
) -> Vec<JoinHandle<Result<WorkerSummary, EngineError>>>
where
    A: AmountType + 'static,
    I: TransactionIndex<A> + 'static,
    R: ResultAggregator<A> + 'static,
{
    let queue = Arc::new(Mutex::new(queue));

    (0..count.max(1))
        .map(|worker_id| {
            let queue = Arc::clone(&queue);
            let matcher = matcher.clone();
            let cancel = cancel.clone();

            tokio::spawn(async move {
                let outcome = drain(worker_id, &matcher, &queue, &cancel).await;
                if outcome.is_err() {
                    cancel.cancel();
                }
                outcome
            })
        })
        .collect()
}

async fn drain<A, I, R>(
    worker_id: usize,
    matcher: &StatementMatcher<A, I, R>,
    queue: &Mutex<mpsc::Receiver<BankStatementRecord<A>>>,
    cancel: &CancellationToken,
) -> Result<WorkerSummary, EngineError>
where
    A: AmountType,
    I: TransactionIndex<A>,
    R: ResultAggregator<A>,
{
    let mut summary = WorkerSummary {
        worker_id,
        ..WorkerSummary::default()
    };

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(EngineError::Cancelled),
            next = async { queue.lock().await.recv().await } => next,
        };

        let Some(statement) = next else {
            break;
        };

        let classification = matcher.classify(statement)?;
        summary.count(&classification);
    }

    debug!(?summary, "Worker finished");
    Ok(summary)
}
