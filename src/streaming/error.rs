use tracing::{error, warn};

use crate::io::IoError;

/// Policy for malformed input rows
pub trait ErrorPolicy: Send + Sync {
    /// Handle a row that failed to parse in `source`
    /// Return true to skip it and continue, false to abort the source
    fn handle_row_error(&self, source: &str, error: &IoError) -> bool;
}

/// Skip bad rows and continue (logged at warn level)
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipErrors;

impl ErrorPolicy for SkipErrors {
    fn handle_row_error(&self, source: &str, error: &IoError) -> bool {
        warn!(source, %error, "Skipping malformed row");
        true
    }
}

/// Abort the source on its first bad row
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortOnError;

impl ErrorPolicy for AbortOnError {
    fn handle_row_error(&self, source: &str, error: &IoError) -> bool {
        error!(source, %error, "Malformed row, aborting");
        false
    }
}

/// Skip bad rows without logging
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSkip;

impl ErrorPolicy for SilentSkip {
    fn handle_row_error(&self, _source: &str, _error: &IoError) -> bool {
        true
    }
}
