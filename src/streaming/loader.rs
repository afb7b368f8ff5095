use futures::{Stream, StreamExt};
use tracing::{debug, info, warn};

use super::error::ErrorPolicy;
use crate::domain::{AmountType, ReconciliationWindow, Transaction};
use crate::engine::EngineError;
use crate::io::IoError;
use crate::storage::{ResultAggregator, TransactionIndex};

/// Counts from loading the ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub accepted: u64,
    pub out_of_window: u64,
    pub rejected: u64,
    /// Rows whose id overwrote an earlier row
    pub replaced: u64,
}

/// Load in-window ledger transactions into the index
///
/// Runs to completion before any statement is matched. Each accepted row counts
/// as processed. A repeated id silently replaces the earlier row (last write
/// wins), which can hide a ledger error, so every replacement is logged.
pub async fn load_transactions<A, S, I, R>(
    mut stream: S,
    window: &ReconciliationWindow,
    index: &I,
    results: &R,
    policy: &dyn ErrorPolicy,
) -> Result<LoadSummary, EngineError>
where
    A: AmountType,
    S: Stream<Item = Result<Transaction<A>, IoError>> + Unpin,
    I: TransactionIndex<A>,
    R: ResultAggregator<A>,
{
    let mut summary = LoadSummary::default();

    while let Some(row) = stream.next().await {
        let transaction = match row {
            Ok(transaction) => transaction,
            Err(e) => {
                if !policy.handle_row_error("transactions", &e) {
                    return Err(EngineError::Loading(e));
                }
                summary.rejected += 1;
                continue;
            }
        };

        if !window.contains_instant(&transaction.timestamp) {
            debug!(id = %transaction.id, timestamp = %transaction.timestamp, "Transaction outside window");
            summary.out_of_window += 1;
            continue;
        }

        if let Some(previous) = index.insert(transaction) {
            warn!(id = %previous.id, "Duplicate transaction id, keeping the later row");
            summary.replaced += 1;
        }
        results.record_processed();
        summary.accepted += 1;
    }

    info!(
        accepted = summary.accepted,
        out_of_window = summary.out_of_window,
        rejected = summary.rejected,
        replaced = summary.replaced,
        indexed = index.len(),
        "Transactions loaded"
    );

    Ok(summary)
}
