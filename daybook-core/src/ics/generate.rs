//! ICS file generation.

use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component, EventLike};

use super::{ICS_UTC_FORMAT, PROP_CATEGORY, PROP_RECURSION_ID, PROP_TIME_STATUS};
use crate::error::DaybookResult;
use crate::event::{Event, TimeStatus};

/// Generate .ics content for an event
pub fn generate_ics(event: &Event) -> DaybookResult<String> {
    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.id);
    ics_event.summary(&event.title);

    // DTSTAMP is required by RFC 5545
    let dtstamp = format_utc(event.updated.unwrap_or_else(Utc::now));
    ics_event.add_property("DTSTAMP", &dtstamp);

    if let Some(updated) = event.updated {
        ics_event.add_property("LAST-MODIFIED", format_utc(updated));
    }

    // Untimed events keep their instant too, so DTSTART is always a UTC datetime
    ics_event.add_property("DTSTART", format_utc(event.datetime));
    if let Some(end) = event.end_datetime {
        ics_event.add_property("DTEND", format_utc(end));
    }

    if let Some(ref loc) = event.location {
        ics_event.location(loc);
    }

    if let Some(ref desc) = event.description {
        ics_event.description(desc);
    }

    // STANDARD is the implied default
    if event.time_status != TimeStatus::Standard {
        ics_event.add_property(PROP_TIME_STATUS, event.time_status.as_str());
    }

    if let Some(ref recursion_id) = event.recursion_id {
        ics_event.add_property(PROP_RECURSION_ID, recursion_id);
    }

    if let Some(ref category_id) = event.category_id {
        ics_event.add_property(PROP_CATEGORY, category_id);
    }

    let ics_event = ics_event.done();
    cal.push(ics_event);
    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string()))
}

fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format(ICS_UTC_FORMAT).to_string()
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with DAYBOOK
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:DAYBOOK\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_test_event() -> Event {
        let mut event = Event::new(
            "Dentist",
            Utc.with_ymd_and_hms(2026, 3, 20, 15, 0, 0).unwrap(),
            TimeStatus::Standard,
        );
        event.id = "test-event-123".to_string();
        event
    }

    #[test]
    fn standard_event_has_no_status_property() {
        let ics = generate_ics(&make_test_event()).unwrap();

        assert!(ics.contains("UID:test-event-123"));
        assert!(ics.contains("DTSTART:20260320T150000Z"));
        assert!(ics.contains("PRODID:DAYBOOK"));
        assert!(!ics.contains("DTEND"));
        assert!(!ics.contains(PROP_TIME_STATUS));
        assert!(!ics.contains("CALSCALE"));
    }

    #[test]
    fn extension_properties_are_written() {
        let mut event = make_test_event();
        event.time_status = TimeStatus::AllDay;
        event.recursion_id = Some("rule-1".into());
        event.category_id = Some("cat-1".into());

        let ics = generate_ics(&event).unwrap();

        assert!(ics.contains("X-DAYBOOK-TIME-STATUS:ALL_DAY"));
        assert!(ics.contains("X-DAYBOOK-RECURSION-ID:rule-1"));
        assert!(ics.contains("X-DAYBOOK-CATEGORY:cat-1"));
    }
}
