pub mod calendars;
pub mod category;
pub mod delete;
pub mod events;
pub mod init;
pub mod move_event;
pub mod new;
pub mod period;
pub mod recur;
pub mod recurrences;
pub mod views;

use anyhow::Result;
use daybook_core::calendar::Calendar;
use daybook_core::event::Event;

/// Find an event by full id or by an unambiguous id prefix.
pub fn find_event(calendar: &Calendar, id: &str) -> Result<Event> {
    let mut matches: Vec<Event> = calendar
        .events()?
        .into_iter()
        .filter(|e| e.id.starts_with(id))
        .collect();

    if let Some(exact) = matches.iter().position(|e| e.id == id) {
        return Ok(matches.swap_remove(exact));
    }

    match matches.len() {
        0 => anyhow::bail!("No event '{}' in calendar '{}'", id, calendar.slug),
        1 => Ok(matches.remove(0)),
        n => anyhow::bail!("'{}' matches {} events; use more of the id", id, n),
    }
}
