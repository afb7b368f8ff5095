use tokio::io::AsyncWrite;

use super::error::IoError;
use crate::domain::AmountType;
use crate::storage::ReconciliationReport;

/// Write the reconciliation summary in human-readable form
pub async fn write_report<A, W>(report: &ReconciliationReport<A>, writer: W) -> Result<(), IoError>
where
    A: AmountType,
    W: AsyncWrite + Unpin + Send,
{
    report.write_to(writer).await?;
    Ok(())
}
