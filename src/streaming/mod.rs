pub mod error;
pub mod ingest;
pub mod loader;
pub mod reconciler;
pub mod workers;

// Re-export commonly used types
pub use error::{AbortOnError, ErrorPolicy, SilentSkip, SkipErrors};
pub use ingest::{IngestSummary, ingest_statements};
pub use loader::{LoadSummary, load_transactions};
pub use reconciler::{
    DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_COUNT, Reconciliation, ReconciliationState,
};
pub use workers::{WorkerSummary, spawn_workers};
