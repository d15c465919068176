//! Recurrence rules and their expansion into concrete events.
//!
//! A rule is expanded once, when it is created: it materializes a bounded
//! batch of events and records when the last one happens. The recorded
//! `recurrence_end` is a snapshot. Editing or deleting a generated event later
//! does not touch the rule or its siblings; `live_end` recomputes the real
//! last occurrence when a caller needs it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_OCCURRENCES, MIN_OCCURRENCES};
use crate::error::{DaybookError, DaybookResult};
use crate::event::{Event, TimeStatus};
use crate::time::{resolve_local, to_local};

/// Upper bound on `interval_count`, keeps every step addition in range.
pub const MAX_INTERVAL_COUNT: u32 = 1000;

/// Unit of repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Day,
    Week,
    Month,
    Year,
}

impl FromStr for IntervalUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "days" | "daily" => Ok(IntervalUnit::Day),
            "week" | "weeks" | "weekly" => Ok(IntervalUnit::Week),
            "month" | "months" | "monthly" => Ok(IntervalUnit::Month),
            "year" | "years" | "yearly" => Ok(IntervalUnit::Year),
            other => Err(format!(
                "Unknown interval '{}'. Expected day, week, month or year",
                other
            )),
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IntervalUnit::Day => "day",
            IntervalUnit::Week => "week",
            IntervalUnit::Month => "month",
            IntervalUnit::Year => "year",
        };
        f.write_str(s)
    }
}

/// Fields copied onto every generated event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateFields {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub time_status: TimeStatus,
    /// Length of each occurrence; occurrences have no end when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
}

impl TemplateFields {
    pub fn new(title: impl Into<String>) -> Self {
        TemplateFields {
            title: title.into(),
            location: None,
            category_id: None,
            time_status: TimeStatus::Standard,
            duration_minutes: None,
        }
    }

    fn instantiate(&self, rule_id: &str, datetime: DateTime<Utc>) -> Event {
        let mut event = Event::new(self.title.clone(), datetime, self.time_status);
        event.end_datetime = self
            .duration_minutes
            .map(|minutes| datetime + Duration::minutes(minutes));
        event.location = self.location.clone();
        event.category_id = self.category_id.clone();
        event.recursion_id = Some(rule_id.to_string());
        event
    }
}

/// What a caller asks for when creating a recurring event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRequest {
    pub anchor: DateTime<Utc>,
    pub interval: IntervalUnit,
    #[serde(default = "default_interval_count")]
    pub interval_count: u32,
    pub occurrence_count: u32,
    #[serde(default)]
    pub triggered: bool,
    pub template: TemplateFields,
}

fn default_interval_count() -> u32 {
    1
}

impl RecurrenceRequest {
    /// Reject out-of-range input before anything is generated or written.
    pub fn validate(&self) -> DaybookResult<()> {
        validate_counts(self.interval_count, self.occurrence_count)?;
        validate_template(&self.template)
    }
}

fn validate_counts(interval_count: u32, occurrence_count: u32) -> DaybookResult<()> {
    if !(MIN_OCCURRENCES..=MAX_OCCURRENCES).contains(&occurrence_count) {
        return Err(DaybookError::validation(format!(
            "Occurrence count must be between {} and {}, got {}",
            MIN_OCCURRENCES, MAX_OCCURRENCES, occurrence_count
        )));
    }
    if interval_count == 0 || interval_count > MAX_INTERVAL_COUNT {
        return Err(DaybookError::validation(format!(
            "Interval count must be between 1 and {}, got {}",
            MAX_INTERVAL_COUNT, interval_count
        )));
    }
    Ok(())
}

fn validate_template(template: &TemplateFields) -> DaybookResult<()> {
    if template.title.trim().is_empty() {
        return Err(DaybookError::validation("Title cannot be empty"));
    }
    if template.duration_minutes.is_some_and(|m| m < 0) {
        return Err(DaybookError::validation("Duration cannot be negative"));
    }
    Ok(())
}

/// A stored recurrence rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub id: String,
    pub interval: IntervalUnit,
    pub interval_count: u32,
    /// Anchor instant of occurrence zero
    pub datetime: DateTime<Utc>,
    pub triggered: bool,
    pub occurrence_count: u32,
    /// Instant of the last generated occurrence, set once after generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_end: Option<DateTime<Utc>>,
    pub template: TemplateFields,
}

/// Result of expanding a rule
#[derive(Debug, Clone)]
pub struct Expansion {
    pub events: Vec<Event>,
    pub recurrence_end: Option<DateTime<Utc>>,
}

impl Expansion {
    pub fn count(&self) -> usize {
        self.events.len()
    }
}

impl RecurrenceRule {
    pub fn from_request(request: RecurrenceRequest) -> DaybookResult<Self> {
        request.validate()?;

        Ok(RecurrenceRule {
            id: uuid::Uuid::new_v4().to_string(),
            interval: request.interval,
            interval_count: request.interval_count,
            datetime: request.anchor,
            triggered: request.triggered,
            occurrence_count: request.occurrence_count,
            recurrence_end: None,
            template: request.template,
        })
    }

    /// Number of events this rule generates: one when triggered.
    pub fn occurrences(&self) -> u32 {
        if self.triggered {
            1
        } else {
            self.occurrence_count
        }
    }

    /// Materialize the rule's occurrences.
    ///
    /// Occurrence `i` falls at the anchor's wall-clock time in `tz` plus
    /// `i * interval_count` units. Each step is taken from the anchor, so
    /// month steps clamp to short months without drifting.
    pub fn expand(&self, tz: &Tz) -> DaybookResult<Expansion> {
        validate_counts(self.interval_count, self.occurrence_count)?;
        validate_template(&self.template)?;

        let anchor = to_local(tz, self.datetime);
        let mut events = Vec::with_capacity(self.occurrences() as usize);

        for index in 0..self.occurrences() {
            let steps = index * self.interval_count;
            let local = step_from(anchor, self.interval, steps).ok_or_else(|| {
                DaybookError::validation(format!(
                    "Occurrence {} of '{}' is out of range",
                    index + 1,
                    self.template.title
                ))
            })?;
            events.push(self.template.instantiate(&self.id, resolve_local(tz, local)));
        }

        let recurrence_end = events.last().map(|e| e.datetime);

        tracing::debug!(
            rule = %self.id,
            count = events.len(),
            end = ?recurrence_end,
            "expanded recurrence"
        );

        Ok(Expansion {
            events,
            recurrence_end,
        })
    }

    /// Latest start among live events still referencing this rule.
    pub fn live_end<'a>(&self, events: impl IntoIterator<Item = &'a Event>) -> Option<DateTime<Utc>> {
        events
            .into_iter()
            .filter(|e| e.recursion_id.as_deref() == Some(self.id.as_str()))
            .map(|e| e.datetime)
            .max()
    }
}

fn step_from(anchor: NaiveDateTime, unit: IntervalUnit, steps: u32) -> Option<NaiveDateTime> {
    match unit {
        IntervalUnit::Day => anchor.checked_add_signed(Duration::days(i64::from(steps))),
        IntervalUnit::Week => anchor.checked_add_signed(Duration::weeks(i64::from(steps))),
        IntervalUnit::Month => anchor.checked_add_months(Months::new(steps)),
        IntervalUnit::Year => anchor.checked_add_months(Months::new(steps.checked_mul(12)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    fn request(interval: IntervalUnit, interval_count: u32, occurrence_count: u32) -> RecurrenceRequest {
        RecurrenceRequest {
            anchor: Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
            interval,
            interval_count,
            occurrence_count,
            triggered: false,
            template: TemplateFields::new("Gym"),
        }
    }

    fn rule(request: RecurrenceRequest) -> RecurrenceRule {
        RecurrenceRule::from_request(request).unwrap()
    }

    #[test]
    fn generates_arithmetic_sequence() {
        let rule = rule(request(IntervalUnit::Day, 3, 10));
        let expansion = rule.expand(&Tz::UTC).unwrap();

        assert_eq!(expansion.count(), 10);
        for (i, event) in expansion.events.iter().enumerate() {
            assert_eq!(event.datetime, rule.datetime + Duration::days(3 * i as i64));
            assert_eq!(event.recursion_id.as_deref(), Some(rule.id.as_str()));
            assert_eq!(event.title, "Gym");
        }
    }

    #[test]
    fn weekly_steps() {
        let rule = rule(request(IntervalUnit::Week, 2, 3));
        let expansion = rule.expand(&Tz::UTC).unwrap();
        let days: Vec<u32> = expansion.events.iter().map(|e| e.datetime.day()).collect();
        assert_eq!(days, vec![5, 19, 2]);
    }

    #[test]
    fn triggered_rule_fires_once() {
        let mut req = request(IntervalUnit::Day, 1, 200);
        req.triggered = true;
        let rule = rule(req);
        let expansion = rule.expand(&Tz::UTC).unwrap();

        assert_eq!(expansion.count(), 1);
        assert_eq!(expansion.events[0].datetime, rule.datetime);
        assert_eq!(expansion.recurrence_end, Some(rule.datetime));
    }

    #[test]
    fn recurrence_end_is_last_occurrence() {
        let rule = rule(request(IntervalUnit::Week, 1, 365));
        let expansion = rule.expand(&Tz::UTC).unwrap();
        let last = expansion.events.last().unwrap().datetime;

        assert_eq!(expansion.recurrence_end, Some(last));
        assert_eq!(last, rule.datetime + Duration::weeks(364));
    }

    #[test]
    fn occurrence_count_bounds() {
        assert!(request(IntervalUnit::Day, 1, 0).validate().is_err());
        assert!(request(IntervalUnit::Day, 1, 366).validate().is_err());
        assert!(request(IntervalUnit::Day, 1, 1).validate().is_ok());
        assert!(request(IntervalUnit::Day, 1, 365).validate().is_ok());
        assert!(request(IntervalUnit::Day, 0, 5).validate().is_err());
        assert!(RecurrenceRule::from_request(request(IntervalUnit::Day, 1, 366)).is_err());
    }

    #[test]
    fn months_clamp_without_drift() {
        let mut req = request(IntervalUnit::Month, 1, 4);
        req.anchor = Utc.with_ymd_and_hms(2026, 1, 31, 8, 0, 0).unwrap();
        let expansion = rule(req).expand(&Tz::UTC).unwrap();

        let dates: Vec<(u32, u32)> = expansion
            .events
            .iter()
            .map(|e| (e.datetime.month(), e.datetime.day()))
            .collect();
        assert_eq!(dates, vec![(1, 31), (2, 28), (3, 31), (4, 30)]);
    }

    #[test]
    fn yearly_steps_from_leap_day() {
        let mut req = request(IntervalUnit::Year, 1, 2);
        req.anchor = Utc.with_ymd_and_hms(2028, 2, 29, 8, 0, 0).unwrap();
        let expansion = rule(req).expand(&Tz::UTC).unwrap();
        assert_eq!(expansion.events[1].datetime.month(), 2);
        assert_eq!(expansion.events[1].datetime.day(), 28);
    }

    #[test]
    fn wall_clock_survives_dst() {
        let tz: Tz = "Europe/Paris".parse().unwrap();
        let mut req = request(IntervalUnit::Week, 1, 3);
        // Monday 2026-03-23 09:00 Paris (UTC+1), DST starts 2026-03-29
        req.anchor = Utc.with_ymd_and_hms(2026, 3, 23, 8, 0, 0).unwrap();
        let expansion = rule(req).expand(&tz).unwrap();

        for event in &expansion.events {
            assert_eq!(event.datetime.with_timezone(&tz).hour(), 9);
        }
        assert_eq!(expansion.events[1].datetime.hour(), 7);
    }

    #[test]
    fn duration_sets_end() {
        let mut req = request(IntervalUnit::Day, 1, 2);
        req.template.duration_minutes = Some(45);
        let expansion = rule(req).expand(&Tz::UTC).unwrap();
        for event in &expansion.events {
            assert_eq!(event.end_datetime, Some(event.datetime + Duration::minutes(45)));
        }
    }

    #[test]
    fn live_end_ignores_snapshot() {
        let rule = rule(request(IntervalUnit::Day, 1, 3));
        let mut events = rule.expand(&Tz::UTC).unwrap().events;
        events.pop();
        events[0].datetime += Duration::days(10);

        assert_eq!(rule.live_end(&events), Some(rule.datetime + Duration::days(10)));
        assert_eq!(rule.live_end(&[]), None);
    }
}
