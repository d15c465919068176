use anyhow::Result;
use chrono::Utc;
use daybook_core::calendar::Calendar;
use daybook_core::date_range::DateRange;
use daybook_core::daybook::Daybook;
use daybook_core::event::Event;
use owo_colors::OwoColorize;

use crate::render::{date_label, event_line};

pub fn run(daybook: &Daybook, calendars: Vec<Calendar>, range: DateRange) -> Result<()> {
    let tz = daybook.tz();
    let today = Utc::now().with_timezone(&tz).date_naive();

    let mut all_events: Vec<(String, Event)> = Vec::new();
    for cal in &calendars {
        for event in cal.events_in_range(&range)? {
            all_events.push((cal.slug.clone(), event));
        }
    }

    all_events.sort_by(|a, b| a.1.datetime.cmp(&b.1.datetime));

    if all_events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    // Group events by local day
    let mut current_date = None;
    let show_calendar = calendars.len() > 1;

    for (cal_slug, event) in &all_events {
        let date = event.local_date(&tz);

        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date_label(date, today).bold());
            current_date = Some(date);
        }

        if show_calendar {
            println!("  {} {}", event_line(event, &tz), format!("[{}]", cal_slug).dimmed());
        } else {
            println!("  {}", event_line(event, &tz));
        }
    }

    Ok(())
}
