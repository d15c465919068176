//! Date range for filtering events.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{DaybookError, DaybookResult};
use crate::time::{end_of_day, start_of_day};

const DEFAULT_RANGE_DAYS: i64 = 30;

/// Half-open range of instants `[from, to)`.
/// None values mean unbounded in that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Every local day from `first` through `last` in `tz`.
    pub fn days(first: NaiveDate, last: NaiveDate, tz: &Tz) -> Self {
        DateRange {
            from: Some(start_of_day(tz, first)),
            to: Some(end_of_day(tz, last)),
        }
    }

    pub fn day(date: NaiveDate, tz: &Tz) -> Self {
        Self::days(date, date, tz)
    }

    /// Parse command-line bounds.
    /// - `from`: "start" for unbounded, or YYYY-MM-DD; defaults to today
    /// - `to`: "end" for unbounded, or YYYY-MM-DD (inclusive); defaults to
    ///   DEFAULT_RANGE_DAYS after `from`
    pub fn from_args(from: Option<&str>, to: Option<&str>, today: NaiveDate, tz: &Tz) -> DaybookResult<Self> {
        let from_date = match from {
            Some("start") => None,
            Some(s) => Some(parse_date(s)?),
            None => Some(today),
        };

        let to_dt = match to {
            Some("end") => None,
            Some(s) => Some(end_of_day(tz, parse_date(s)?)),
            None => {
                let base = from_date.unwrap_or(today);
                Some(end_of_day(tz, base + Duration::days(DEFAULT_RANGE_DAYS)))
            }
        };

        let range = DateRange {
            from: from_date.map(|d| start_of_day(tz, d)),
            to: to_dt,
        };

        if let (Some(f), Some(t)) = (range.from, range.to) {
            if t <= f {
                return Err(DaybookError::validation("Range end must be after its start"));
            }
        }

        Ok(range)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from.is_none_or(|f| instant >= f) && self.to.is_none_or(|t| instant < t)
    }
}

/// Parse YYYY-MM-DD
pub fn parse_date(s: &str) -> DaybookResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| DaybookError::validation(format!("Invalid date format '{}'. Expected YYYY-MM-DD", s)))
}
