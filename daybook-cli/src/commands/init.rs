use anyhow::Result;
use daybook_core::daybook::Daybook;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(mut daybook: Daybook, name: &str, color: Option<String>) -> Result<()> {
    let calendar = daybook.create_calendar(name, color)?;
    println!("{}", format!("Created {}", calendar.render()).green());

    if daybook.set_default_calendar_if_unset(&calendar.slug)? {
        println!("{}", "Set as default calendar".dimmed());
    }

    Ok(())
}
