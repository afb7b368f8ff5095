use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::error::AppError;

pub const USAGE: &str =
    "Usage: recon <transactions.csv> <statement.csv[,statement.csv...]> [statement.csv...] <start YYYY-MM-DD> <end YYYY-MM-DD>";

/// Validated command-line arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub transactions: PathBuf,
    pub statements: Vec<PathBuf>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CliArgs {
    /// Parse `args` as received from `std::env::args`, program name first
    ///
    /// Paths are only checked syntactically here; see [`validate_csv_path`].
    pub fn parse(args: Vec<String>) -> Result<Self, AppError> {
        if args.len() < 5 {
            return Err(AppError::InvalidArguments(USAGE.to_string()));
        }

        let end = parse_date(&args[args.len() - 1])?;
        let start = parse_date(&args[args.len() - 2])?;

        let statements: Vec<PathBuf> = args[2..args.len() - 2]
            .iter()
            .flat_map(|arg| arg.split(','))
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .collect();

        if statements.is_empty() {
            return Err(AppError::InvalidArguments(
                "at least one bank statement file is required".to_string(),
            ));
        }

        Ok(Self {
            transactions: PathBuf::from(&args[1]),
            statements,
            start,
            end,
        })
    }

    /// Check the ledger and every statement file
    pub fn validate(&self) -> Result<(), AppError> {
        validate_csv_path(&self.transactions)?;
        self.statements
            .iter()
            .try_for_each(|path| validate_csv_path(path))
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(value.to_string()))
}

/// The path must carry a `.csv` extension and name an existing file
pub fn validate_csv_path(path: &Path) -> Result<(), AppError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(AppError::NotCsv(path.display().to_string()));
    }

    if !path.is_file() {
        return Err(AppError::FileNotFound(path.display().to_string()));
    }

    Ok(())
}
