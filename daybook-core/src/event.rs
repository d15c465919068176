//! Calendar events.
//!
//! An `Event` is a single materialized occurrence. Events generated by a
//! recurrence rule keep a weak back-reference to it in `recursion_id`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DURATION_MINUTES;
use crate::time::to_local;

/// Whether an event sits at a clock time or in one of the untimed buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeStatus {
    #[default]
    Standard,
    AllDay,
    NoTime,
}

impl TimeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeStatus::Standard => "STANDARD",
            TimeStatus::AllDay => "ALL_DAY",
            TimeStatus::NoTime => "NO_TIME",
        }
    }
}

impl FromStr for TimeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STANDARD" => Ok(TimeStatus::Standard),
            "ALL_DAY" => Ok(TimeStatus::AllDay),
            "NO_TIME" => Ok(TimeStatus::NoTime),
            other => Err(format!("Unknown time status '{}'", other)),
        }
    }
}

impl fmt::Display for TimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub datetime: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_status: TimeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Rule that generated this event, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recursion_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    /// Last write time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl Event {
    pub fn new(title: impl Into<String>, datetime: DateTime<Utc>, time_status: TimeStatus) -> Self {
        Event {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            datetime,
            end_datetime: None,
            time_status,
            location: None,
            description: None,
            recursion_id: None,
            category_id: None,
            updated: None,
        }
    }

    pub fn is_timed(&self) -> bool {
        self.time_status == TimeStatus::Standard
    }

    /// End used for layout: `end_datetime`, or start plus the default span.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.end_datetime
            .unwrap_or(self.datetime + Duration::minutes(DEFAULT_DURATION_MINUTES))
    }

    pub fn local_date(&self, tz: &Tz) -> NaiveDate {
        to_local(tz, self.datetime).date()
    }

    /// Start as `HH:MM` in `tz`, the format drop targets use.
    pub fn local_time_label(&self, tz: &Tz) -> String {
        to_local(tz, self.datetime).format("%H:%M").to_string()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn effective_end_defaults_to_fifteen_minutes() {
        let start = Utc.with_ymd_and_hms(2026, 3, 20, 9, 0, 0).unwrap();
        let mut event = Event::new("Standup", start, TimeStatus::Standard);
        assert_eq!(event.effective_end(), start + Duration::minutes(15));

        event.end_datetime = Some(start + Duration::hours(2));
        assert_eq!(event.effective_end(), start + Duration::hours(2));
    }

    #[test]
    fn time_status_wire_names() {
        let json = serde_json::to_string(&TimeStatus::NoTime).unwrap();
        assert_eq!(json, "\"NO_TIME\"");
        assert_eq!("ALL_DAY".parse::<TimeStatus>().unwrap(), TimeStatus::AllDay);
        assert!("LATER".parse::<TimeStatus>().is_err());
    }

    #[test]
    fn local_label_uses_zone() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let start = Utc.with_ymd_and_hms(2026, 1, 10, 15, 30, 0).unwrap();
        let event = Event::new("Lunch", start, TimeStatus::Standard);
        assert_eq!(event.local_time_label(&tz), "10:30");
    }
}
