//! Natural-language date, time and duration input.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use daybook_core::constants::UNTIMED_HOUR;
use daybook_core::event::{Event, TimeStatus};
use daybook_core::time::resolve_local;

/// A parsed "when": a wall-clock time, or just a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    At(NaiveDateTime),
    On(NaiveDate),
}

impl When {
    pub fn date(&self) -> NaiveDate {
        match self {
            When::At(dt) => dt.date(),
            When::On(d) => *d,
        }
    }

    /// Start instant and time status for an event beginning at this point.
    /// Days become all-day events (or untimed with `untimed`) anchored at noon.
    pub fn to_event_start(self, tz: &Tz, untimed: bool) -> (chrono::DateTime<chrono::Utc>, TimeStatus) {
        match self {
            When::At(dt) => (resolve_local(tz, dt), TimeStatus::Standard),
            When::On(d) => {
                let noon = NaiveTime::from_hms_opt(UNTIMED_HOUR, 0, 0).unwrap_or_default();
                let status = if untimed { TimeStatus::NoTime } else { TimeStatus::AllDay };
                (resolve_local(tz, d.and_time(noon)), status)
            }
        }
    }

    /// Build a new event starting here.
    pub fn new_event(self, title: String, tz: &Tz, untimed: bool) -> Event {
        let (datetime, status) = self.to_event_start(tz, untimed);
        Event::new(title, datetime, status)
    }
}

/// Expand common abbreviations that fuzzydate doesn't handle.
fn expand_abbreviations(input: &str) -> String {
    let abbrevs = [
        ("mon", "monday"),
        ("tue", "tuesday"),
        ("tues", "tuesday"),
        ("wed", "wednesday"),
        ("thu", "thursday"),
        ("thur", "thursday"),
        ("thurs", "thursday"),
        ("fri", "friday"),
        ("sat", "saturday"),
        ("sun", "sunday"),
        ("jan", "january"),
        ("feb", "february"),
        ("mar", "march"),
        ("apr", "april"),
        ("jun", "june"),
        ("jul", "july"),
        ("aug", "august"),
        ("sep", "september"),
        ("sept", "september"),
        ("oct", "october"),
        ("nov", "november"),
        ("dec", "december"),
    ];

    lower_words(input)
        .map(|word| {
            abbrevs
                .iter()
                .find(|(abbr, _)| *abbr == word)
                .map(|(_, full)| (*full).to_string())
                .unwrap_or(word)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn lower_words(input: &str) -> impl Iterator<Item = String> + '_ {
    input.split_whitespace().map(str::to_lowercase)
}

/// Parse a date/time such as "2026-03-20T15:00", "2026-03-20",
/// "tomorrow 3pm" or "next friday".
///
/// Input with a time token (am/pm, HH:MM, noon, midnight, "at 3") is a
/// clock time; anything else is a whole day.
pub fn parse_when(input: &str) -> Result<When> {
    let trimmed = input.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M") {
        return Ok(When::At(dt));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M") {
        return Ok(When::At(dt));
    }
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(When::On(d));
    }

    let expanded = expand_abbreviations(trimmed);
    let dt = fuzzydate::parse(&expanded)
        .map_err(|_| anyhow::anyhow!("Could not parse date/time: \"{}\"", input))?;

    if has_time_component(trimmed) {
        Ok(When::At(dt))
    } else {
        Ok(When::On(dt.date()))
    }
}

/// Parse a day for the views; defaults to `today`.
pub fn parse_day(input: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match input {
        None => Ok(today),
        Some(s) => Ok(parse_when(s)?.date()),
    }
}

/// Check if the user's input string contains time-related tokens.
fn has_time_component(input: &str) -> bool {
    let lower = input.to_lowercase();

    if lower.contains("noon") || lower.contains("midnight") {
        return true;
    }

    // am/pm right after a digit, e.g. "6pm", "6 pm", "11am"
    let bytes = lower.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if (b == b'a' || b == b'p') && i + 1 < bytes.len() && bytes[i + 1] == b'm' {
            if i > 0 && bytes[i - 1].is_ascii_digit() {
                return true;
            }
            if i > 1 && bytes[i - 1] == b' ' && bytes[i - 2].is_ascii_digit() {
                return true;
            }
        }
    }

    // HH:MM
    for (i, &b) in bytes.iter().enumerate() {
        if b == b':' {
            let has_digit_before = i > 0 && bytes[i - 1].is_ascii_digit();
            let has_digit_after = i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit();
            if has_digit_before && has_digit_after {
                return true;
            }
        }
    }

    // "at" followed by a digit
    let after_at = lower
        .find(" at ")
        .map(|pos| &lower[pos + 4..])
        .or_else(|| lower.strip_prefix("at "));
    if let Some(after) = after_at {
        if after.starts_with(|c: char| c.is_ascii_digit()) {
            return true;
        }
    }

    false
}

/// Parse a length such as "30m", "1h 30m" or "2hours".
pub fn parse_length(input: &str) -> Result<Duration> {
    let std_dur = humantime::parse_duration(input.trim())
        .with_context(|| format!("Could not parse duration: \"{}\"", input))?;
    Duration::from_std(std_dur).context("Duration too large")
}

/// Parse an end input: a length first, then "until <when>" / "to <when>" / a when.
/// Returns the length from `start`.
pub fn parse_end(input: &str, start: NaiveDateTime) -> Result<Duration> {
    if let Ok(length) = parse_length(input) {
        return Ok(length);
    }

    let cleaned = input
        .strip_prefix("until ")
        .or_else(|| input.strip_prefix("to "))
        .unwrap_or(input);

    let end = match parse_when(cleaned)? {
        When::At(dt) => dt,
        When::On(d) => d.and_time(start.time()),
    };

    if end <= start {
        anyhow::bail!("End must be after the start");
    }
    Ok(end - start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 20)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn time_component_am_pm() {
        assert!(has_time_component("tomorrow 6pm"));
        assert!(has_time_component("friday 11am"));
        assert!(has_time_component("sat 3 pm"));
        assert!(has_time_component("9AM"));
    }

    #[test]
    fn time_component_colon_and_keywords() {
        assert!(has_time_component("tomorrow 15:00"));
        assert!(has_time_component("tomorrow noon"));
        assert!(has_time_component("friday at 15"));
        assert!(has_time_component("at 9"));
    }

    #[test]
    fn no_time_component() {
        assert!(!has_time_component("tomorrow"));
        assert!(!has_time_component("march 20"));
        assert!(!has_time_component("december"));
        assert!(!has_time_component("camp"));
    }

    #[test]
    fn expands_abbreviations() {
        assert_eq!(expand_abbreviations("sat 3pm"), "saturday 3pm");
        assert_eq!(expand_abbreviations("Sept 5"), "september 5");
        assert_eq!(expand_abbreviations("next friday"), "next friday");
    }

    #[test]
    fn iso_inputs_skip_fuzzy_parsing() {
        assert_eq!(parse_when("2026-03-20T09:30").unwrap(), When::At(at(9, 30)));
        assert_eq!(
            parse_when("2026-03-20").unwrap(),
            When::On(NaiveDate::from_ymd_opt(2026, 3, 20).unwrap())
        );
    }

    #[test]
    fn fuzzy_inputs() {
        assert!(matches!(parse_when("tomorrow 3pm").unwrap(), When::At(_)));
        assert!(matches!(parse_when("tomorrow").unwrap(), When::On(_)));

        let When::On(d) = parse_when("march 20").unwrap() else {
            panic!("expected a day");
        };
        assert_eq!((d.month(), d.day()), (3, 20));

        assert!(parse_when("not a date at all xyz").is_err());
    }

    #[test]
    fn lengths() {
        assert_eq!(parse_length("30m").unwrap(), Duration::minutes(30));
        assert_eq!(parse_length("2hours").unwrap(), Duration::hours(2));
        assert!(parse_length("soon").is_err());
    }

    #[test]
    fn end_as_length_or_time() {
        assert_eq!(parse_end("45m", at(15, 0)).unwrap(), Duration::minutes(45));
        assert_eq!(
            parse_end("until 2026-03-20T17:30", at(15, 0)).unwrap(),
            Duration::minutes(150)
        );
        assert!(parse_end("2026-03-20T14:00", at(15, 0)).is_err());
    }

    #[test]
    fn days_become_noon_events() {
        let tz: Tz = "Europe/Paris".parse().unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();

        let (start, status) = When::On(day).to_event_start(&tz, false);
        assert_eq!(status, TimeStatus::AllDay);
        assert_eq!(start.to_rfc3339(), "2026-07-01T10:00:00+00:00");

        let (_, status) = When::On(day).to_event_start(&tz, true);
        assert_eq!(status, TimeStatus::NoTime);
    }
}
