//! Seven-day and month grids.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::day::{DayLayout, OverlapMode, pack_day};
use crate::event::{Event, TimeStatus};
use crate::period::Period;

/// First day of the displayed week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    fn weekday(self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }

    /// The first day of the week containing `date`.
    pub fn week_of(self, date: NaiveDate) -> NaiveDate {
        let offset = (date.weekday().num_days_from_monday() + 7
            - self.weekday().num_days_from_monday())
            % 7;
        date - Duration::days(i64::from(offset))
    }
}

/// One day of a grid: untimed buckets plus the packed timed events
#[derive(Debug)]
pub struct DayColumn<'a> {
    pub date: NaiveDate,
    pub all_day: Vec<&'a Event>,
    pub no_time: Vec<&'a Event>,
    pub timed: DayLayout<'a, Event>,
    pub periods: Vec<&'a Period>,
}

/// Bucket and pack the events that start on `date`.
///
/// Only `STANDARD` events reach the packer; all-day and untimed events are
/// listed separately in their own buckets.
pub fn build_day<'a>(
    date: NaiveDate,
    events: &'a [Event],
    periods: &'a [Period],
    tz: &Tz,
    mode: OverlapMode,
) -> DayColumn<'a> {
    let mut all_day = Vec::new();
    let mut no_time = Vec::new();
    let mut timed = Vec::new();

    for event in events.iter().filter(|e| e.local_date(tz) == date) {
        match event.time_status {
            TimeStatus::Standard => timed.push(event),
            TimeStatus::AllDay => all_day.push(event),
            TimeStatus::NoTime => no_time.push(event),
        }
    }

    DayColumn {
        date,
        all_day,
        no_time,
        timed: pack_day(timed, date, tz, mode),
        periods: periods.iter().filter(|p| p.contains(date)).collect(),
    }
}

/// Seven consecutive day columns
#[derive(Debug)]
pub struct WeekGrid<'a> {
    pub days: Vec<DayColumn<'a>>,
}

impl<'a> WeekGrid<'a> {
    /// Build the week containing `date`.
    pub fn build(
        date: NaiveDate,
        week_start: WeekStart,
        events: &'a [Event],
        periods: &'a [Period],
        tz: &Tz,
        mode: OverlapMode,
    ) -> Self {
        let first = week_start.week_of(date);
        let days = (0..7)
            .map(|i| build_day(first + Duration::days(i), events, periods, tz, mode))
            .collect();

        WeekGrid { days }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.days.last().map(|d| d.date)
    }
}

/// Rows of the month grid containing `date`, each a full week.
pub fn month_weeks(date: NaiveDate, week_start: WeekStart) -> Vec<[NaiveDate; 7]> {
    let first_of_month = date.with_day(1).unwrap_or(date);
    let mut cursor = week_start.week_of(first_of_month);
    let mut weeks = Vec::new();

    loop {
        let mut week = [cursor; 7];
        for (i, day) in week.iter_mut().enumerate() {
            *day = cursor + Duration::days(i as i64);
        }
        weeks.push(week);
        cursor += Duration::days(7);

        if cursor.month() != first_of_month.month() || cursor.year() != first_of_month.year() {
            break;
        }
    }

    weeks
}
