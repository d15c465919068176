use anyhow::Result;
use daybook_core::calendar::Calendar;
use daybook_core::daybook::Daybook;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::commands::find_event;
use crate::render::event_line;

pub fn run(daybook: &Daybook, calendar: &Calendar, id: &str, force: bool) -> Result<()> {
    let event = find_event(calendar, id)?;

    println!("  {}", event_line(&event, &daybook.tz()));

    // Confirm unless --force
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete '{}'?", event.title))
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    calendar.delete_event(&event.id)?;
    println!("{}", format!("  Deleted: {}", event.title).red());

    Ok(())
}
