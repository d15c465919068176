//! Rescheduling an event from a drop target.
//!
//! Day views expose two kinds of drop targets: a clock time (`HH:MM`) in the
//! time grid, or one of the untimed buckets (`NO_TIME`, `ALL_DAY`). Dropping
//! an event turns into an `EventPatch` against the date being viewed.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::constants::UNTIMED_HOUR;
use crate::error::DaybookError;
use crate::event::{Event, TimeStatus};
use crate::time::resolve_local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Time(NaiveTime),
    NoTime,
    AllDay,
}

impl FromStr for DropTarget {
    type Err = DaybookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NO_TIME" => return Ok(DropTarget::NoTime),
            "ALL_DAY" => return Ok(DropTarget::AllDay),
            _ => {}
        }

        let invalid = || DaybookError::validation(format!("Invalid drop target '{}'", s));

        let bytes = s.as_bytes();
        let shaped = bytes.len() == 5
            && bytes[2] == b':'
            && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
        if !shaped {
            return Err(invalid());
        }

        let hour = s[..2].parse().map_err(|_| invalid())?;
        let minute = s[3..].parse().map_err(|_| invalid())?;
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(DropTarget::Time)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropTarget::Time(t) => write!(f, "{}", t.format("%H:%M")),
            DropTarget::NoTime => f.write_str("NO_TIME"),
            DropTarget::AllDay => f.write_str("ALL_DAY"),
        }
    }
}

/// Changes to apply to a dropped event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPatch {
    pub time_status: TimeStatus,
    pub datetime: DateTime<Utc>,
    pub end_datetime: Option<DateTime<Utc>>,
}

impl EventPatch {
    pub fn apply_to(&self, event: &mut Event) {
        event.time_status = self.time_status;
        event.datetime = self.datetime;
        event.end_datetime = self.end_datetime;
    }
}

/// Work out what dropping `event` on `target` while viewing `view_date` changes.
///
/// Returns `None` when the drop is a no-op: the event already sits at that
/// clock time on that date, or already has the bucket's status.
pub fn plan_reschedule(
    event: &Event,
    target: DropTarget,
    view_date: NaiveDate,
    tz: &Tz,
) -> Option<EventPatch> {
    let (time_status, datetime) = match target {
        DropTarget::Time(time) => {
            let unchanged = event.time_status == TimeStatus::Standard
                && event.local_date(tz) == view_date
                && event.local_time_label(tz) == target.to_string();
            if unchanged {
                return None;
            }
            (TimeStatus::Standard, resolve_local(tz, view_date.and_time(time)))
        }
        DropTarget::NoTime | DropTarget::AllDay => {
            let status = if target == DropTarget::NoTime {
                TimeStatus::NoTime
            } else {
                TimeStatus::AllDay
            };
            if event.time_status == status {
                return None;
            }
            let noon = NaiveTime::from_hms_opt(UNTIMED_HOUR, 0, 0)?;
            (status, resolve_local(tz, view_date.and_time(noon)))
        }
    };

    // Keep the event's length when it has an explicit end
    let delta = datetime - event.datetime;
    let end_datetime = event.end_datetime.map(|end| end + delta);

    Some(EventPatch {
        time_status,
        datetime,
        end_datetime,
    })
}
