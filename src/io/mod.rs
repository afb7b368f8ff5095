pub mod csv_reader;
pub mod error;
pub mod parse;
pub mod report_writer;
pub mod source;

// Re-export commonly used types
pub use csv_reader::{CsvStatementStream, CsvTransactionStream};
pub use error::IoError;
pub use parse::{RawStatementRow, RawTransactionRow, StatementLine};
pub use report_writer::write_report;
pub use source::{DEFAULT_BANK_NAME, StatementSource, bank_name_from_path};
