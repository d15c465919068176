//! ICS file parsing using the icalendar crate's parser.

use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Property, read_calendar, unfold},
};

use super::{ICS_UTC_FORMAT, PROP_CATEGORY, PROP_RECURSION_ID, PROP_TIME_STATUS};
use crate::constants::UNTIMED_HOUR;
use crate::event::{Event, TimeStatus};
use crate::time::resolve_local;

/// Parse ICS content into an Event
///
/// Files written by other tools are accepted too: a date-only DTSTART
/// becomes an all-day event at noon UTC.
pub fn parse_event(content: &str) -> Option<Event> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).ok()?;
    let vevent = calendar.components.iter().find(|c| c.name == "VEVENT")?;

    let id = vevent.find_prop("UID")?.val.to_string();
    let title = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .unwrap_or_else(|| "(No title)".to_string());

    let (datetime, date_only) = instant(vevent.find_prop("DTSTART")?)?;
    let end_datetime = vevent
        .find_prop("DTEND")
        .and_then(instant)
        .map(|(dt, _)| dt);

    let time_status = vevent
        .find_prop(PROP_TIME_STATUS)
        .and_then(|p| p.val.as_ref().parse().ok())
        .unwrap_or(if date_only {
            TimeStatus::AllDay
        } else {
            TimeStatus::Standard
        });

    let updated = vevent
        .find_prop("LAST-MODIFIED")
        .and_then(|p| NaiveDateTime::parse_from_str(p.val.as_ref(), ICS_UTC_FORMAT).ok())
        .map(|naive| naive.and_utc());

    Some(Event {
        id,
        title,
        datetime,
        end_datetime,
        time_status,
        location: vevent.find_prop("LOCATION").map(|p| p.val.to_string()),
        description: vevent.find_prop("DESCRIPTION").map(|p| p.val.to_string()),
        recursion_id: vevent.find_prop(PROP_RECURSION_ID).map(|p| p.val.to_string()),
        category_id: vevent.find_prop(PROP_CATEGORY).map(|p| p.val.to_string()),
        updated,
    })
}

/// Read a date/time property as an instant, flagging date-only values.
fn instant(prop: &Property<'_>) -> Option<(DateTime<Utc>, bool)> {
    let dpt = DatePerhapsTime::try_from(prop).ok()?;

    match dpt {
        DatePerhapsTime::Date(d) => {
            let noon = NaiveTime::from_hms_opt(UNTIMED_HOUR, 0, 0)?;
            Some((d.and_time(noon).and_utc(), true))
        }
        DatePerhapsTime::DateTime(cal_dt) => {
            let dt = match cal_dt {
                CalendarDateTime::Utc(dt) => dt,
                CalendarDateTime::Floating(naive) => naive.and_utc(),
                CalendarDateTime::WithTimezone { date_time, tzid } => match tzid.parse::<Tz>() {
                    Ok(tz) => resolve_local(&tz, date_time),
                    Err(_) => date_time.and_utc(),
                },
            };
            Some((dt, false))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ics::generate_ics;
    use chrono::{Duration, TimeZone};

    #[test]
    fn roundtrip_keeps_daybook_fields() {
        let start = Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap();
        let mut event = Event::new("Pick up parcel", start, TimeStatus::NoTime);
        event.end_datetime = Some(start + Duration::minutes(30));
        event.location = Some("Post office".into());
        event.recursion_id = Some("rule-7".into());
        event.category_id = Some("errands".into());
        event.updated = Some(Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap());

        let ics = generate_ics(&event).unwrap();
        let parsed = parse_event(&ics).expect("Should parse generated ICS");

        assert_eq!(parsed, event);
    }

    #[test]
    fn parses_foreign_all_day_event() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:holiday-1\r\n\
SUMMARY:Bank holiday\r\n\
DTSTART;VALUE=DATE:20260525\r\n\
END:VEVENT\r\n\
END:VCALENDAR";

        let event = parse_event(ics).expect("Should parse");

        assert_eq!(event.time_status, TimeStatus::AllDay);
        assert_eq!(event.datetime, Utc.with_ymd_and_hms(2026, 5, 25, 12, 0, 0).unwrap());
        assert_eq!(event.end_datetime, None);
    }

    #[test]
    fn parses_zoned_start() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:zoned-1\r\n\
SUMMARY:Call\r\n\
DTSTART;TZID=Europe/Berlin:20260115T100000\r\n\
END:VEVENT\r\n\
END:VCALENDAR";

        let event = parse_event(ics).expect("Should parse");

        assert_eq!(event.time_status, TimeStatus::Standard);
        assert_eq!(event.datetime, Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap());
    }

    #[test]
    fn missing_uid_is_rejected() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:No id\r\n\
DTSTART:20260115T100000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR";

        assert!(parse_event(ics).is_none());
    }
}
