use chrono::{DateTime, Days, FixedOffset, NaiveDate, TimeZone};

use super::error::DomainError;

/// Half-open `[start, end)` interval in a fixed local offset
///
/// Built from calendar dates: `start` begins at local midnight of the first day,
/// `end` is local midnight of the day after the last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciliationWindow {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    offset: FixedOffset,
}

impl ReconciliationWindow {
    pub fn from_dates(
        start: NaiveDate,
        end: NaiveDate,
        offset: FixedOffset,
    ) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let next_day = end.checked_add_days(Days::new(1)).ok_or(DomainError::Overflow)?;

        Ok(Self {
            start: Self::local_midnight(start, offset)?,
            end: Self::local_midnight(next_day, offset)?,
            offset,
        })
    }

    fn local_midnight(
        date: NaiveDate,
        offset: FixedOffset,
    ) -> Result<DateTime<FixedOffset>, DomainError> {
        let midnight = date.and_hms_opt(0, 0, 0).ok_or(DomainError::Overflow)?;
        offset
            .from_local_datetime(&midnight)
            .single()
            .ok_or(DomainError::Overflow)
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// True if the instant lies in `[start, end)`, whatever offset it was recorded in
    pub fn contains_instant(&self, instant: &DateTime<FixedOffset>) -> bool {
        *instant >= self.start && *instant < self.end
    }

    /// True if local midnight of `date` lies in the window
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        Self::local_midnight(date, self.offset)
            .map(|midnight| self.contains_instant(&midnight))
            .unwrap_or(false)
    }
}
