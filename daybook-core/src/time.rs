//! Wall-clock helpers shared by the views, recurrence and rescheduling.
//!
//! Events store UTC instants; everything a user sees (days, `HH:MM` drop
//! targets, "every month on the 31st") is wall-clock time in the calendar's
//! configured zone.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Convert a wall-clock time in `tz` to an instant.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times
/// skipped by a DST gap move forward by the size of the gap.
pub fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| naive.and_utc()),
    }
}

/// Instant of local midnight starting `date`.
pub fn start_of_day(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    resolve_local(tz, date.and_time(NaiveTime::default()))
}

/// Instant of local midnight ending `date` (start of the next day).
pub fn end_of_day(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    match date.succ_opt() {
        Some(next) => start_of_day(tz, next),
        None => start_of_day(tz, date) + Duration::days(1),
    }
}

/// Wall-clock view of an instant.
pub fn to_local(tz: &Tz, instant: DateTime<Utc>) -> NaiveDateTime {
    instant.with_timezone(tz).naive_local()
}

/// Resolve a timezone name, falling back to the system zone, then UTC.
pub fn resolve_timezone(name: Option<&str>) -> Result<Tz, String> {
    if let Some(name) = name {
        return name
            .parse::<Tz>()
            .map_err(|_| format!("Unknown time zone '{}'", name));
    }

    Ok(iana_time_zone::get_timezone()
        .ok()
        .and_then(|name| name.parse::<Tz>().ok())
        .unwrap_or(Tz::UTC))
}
