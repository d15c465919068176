use anyhow::Result;
use daybook_core::daybook::Daybook;
use owo_colors::OwoColorize;

use crate::render::{Render, pluralize};

pub fn run(daybook: &Daybook) -> Result<()> {
    let calendars = daybook.calendars();

    if calendars.is_empty() {
        println!("{}", "No calendars yet. Create one with `daybook init <name>`".dimmed());
        return Ok(());
    }

    let default = daybook.config().default_calendar.as_deref();

    for calendar in &calendars {
        let count = calendar.events()?.len();
        let marker = if Some(calendar.slug.as_str()) == default { " (default)" } else { "" };
        println!(
            "{}{}  {}",
            calendar.render(),
            marker.green(),
            format!("{} {}", count, pluralize("event", count)).dimmed()
        );
    }

    println!("\n{}", daybook.display_path().display().to_string().dimmed());
    Ok(())
}
