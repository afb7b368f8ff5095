use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};

use super::error::AppError;
use crate::domain::AmountType;
use crate::streaming::{
    AbortOnError, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_COUNT, Reconciliation, SkipErrors,
};

pub const WORKERS_VAR: &str = "RECON_WORKERS";
pub const QUEUE_CAPACITY_VAR: &str = "RECON_QUEUE_CAPACITY";
pub const UTC_OFFSET_VAR: &str = "RECON_UTC_OFFSET";
pub const STATEMENT_ERRORS_VAR: &str = "RECON_STATEMENT_ERRORS";

/// Offset applied to statement dates and the window when none is configured
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 7 * 3600;

/// What to do with a malformed bank statement row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementErrorMode {
    #[default]
    Skip,
    Abort,
}

impl FromStr for StatementErrorMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            _ => Err(AppError::InvalidConfig {
                key: STATEMENT_ERRORS_VAR,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for StatementErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => f.write_str("skip"),
            Self::Abort => f.write_str("abort"),
        }
    }
}

/// Runtime settings, overridable through the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconConfig {
    pub worker_count: usize,
    pub queue_capacity: usize,
    pub utc_offset: FixedOffset,
    pub statement_errors: StatementErrorMode,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            utc_offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix()),
            statement_errors: StatementErrorMode::default(),
        }
    }
}

impl ReconConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup; unset or blank values keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get(WORKERS_VAR) {
            config.worker_count = parse_positive(WORKERS_VAR, &value)?;
        }
        if let Some(value) = get(QUEUE_CAPACITY_VAR) {
            config.queue_capacity = parse_positive(QUEUE_CAPACITY_VAR, &value)?;
        }
        if let Some(value) = get(UTC_OFFSET_VAR) {
            config.utc_offset = parse_offset(&value)?;
        }
        if let Some(value) = get(STATEMENT_ERRORS_VAR) {
            config.statement_errors = value.trim().parse()?;
        }

        Ok(config)
    }

    /// Apply pool size, queue capacity and statement policy to a run
    pub fn configure<A>(&self, recon: Reconciliation<A>) -> Reconciliation<A>
    where
        A: AmountType + 'static,
    {
        let recon = recon
            .with_workers(self.worker_count)
            .with_queue_capacity(self.queue_capacity);

        match self.statement_errors {
            StatementErrorMode::Skip => recon.with_statement_policy(SkipErrors),
            StatementErrorMode::Abort => recon.with_statement_policy(AbortOnError),
        }
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<usize, AppError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::InvalidConfig {
            key,
            value: value.to_string(),
        }),
    }
}

/// Parse `+HH:MM`, `-HH:MM` or `Z`
fn parse_offset(value: &str) -> Result<FixedOffset, AppError> {
    let invalid = || AppError::InvalidConfig {
        key: UTC_OFFSET_VAR,
        value: value.to_string(),
    };

    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'+') => (1, &trimmed[1..]),
        Some(b'-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
