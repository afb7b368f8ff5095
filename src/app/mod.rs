pub mod args;
pub mod cli;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use args::{CliArgs, USAGE, parse_date, validate_csv_path};
pub use cli::{CliApp, ConfiguredApp, Writers, exit_code};
pub use config::{ReconConfig, StatementErrorMode};
pub use error::AppError;
