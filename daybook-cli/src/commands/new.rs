use anyhow::Result;
use daybook_core::calendar::Calendar;
use daybook_core::daybook::Daybook;
use dialoguer::Input;
use owo_colors::OwoColorize;

use crate::utils::datetime::{When, parse_end, parse_when};

pub struct NewEvent {
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub untimed: bool,
}

pub fn run(daybook: &Daybook, calendar: &Calendar, args: NewEvent) -> Result<()> {
    let tz = daybook.tz();
    let interactive = args.title.is_none() || args.start.is_none();

    // --- Title ---
    let title = match args.title {
        Some(t) => t,
        None => Input::<String>::new().with_prompt("  Title").interact_text()?,
    };

    // --- Start ---
    let when = match args.start {
        Some(s) => parse_when(&s)?,
        None => prompt_with_retry("  When?", parse_when)?,
    };

    // --- End (timed events only) ---
    let length = match when {
        When::On(_) => None,
        When::At(start) => match args.end {
            Some(input) => Some(parse_end(&input, start)?),
            None if interactive => prompt_length(start)?,
            None => None,
        },
    };

    // --- Location ---
    let location = match args.location {
        Some(loc) => Some(loc),
        None if interactive => Some(
            Input::<String>::new()
                .with_prompt("  Where? (skip)")
                .default(String::new())
                .show_default(false)
                .interact_text()?,
        ),
        None => None,
    }
    .filter(|loc| !loc.is_empty());

    // --- Category ---
    let category_id = match args.category {
        Some(name) => Some(find_category(calendar, &name)?),
        None => None,
    };

    let mut event = when.new_event(title, &tz, args.untimed);
    let start = event.datetime;
    event.end_datetime = length.map(|l| start + l);
    event.location = location;
    event.category_id = category_id;

    let event = calendar.create_event(&event)?;

    if interactive {
        println!();
    }
    println!("{}", format!("  Created: {}", event.title).green());

    Ok(())
}

/// Resolve a category by name (case-insensitive) or id.
pub fn find_category(calendar: &Calendar, name_or_id: &str) -> Result<String> {
    calendar
        .categories()?
        .into_iter()
        .find(|c| c.id == name_or_id || c.name.eq_ignore_ascii_case(name_or_id))
        .map(|c| c.id)
        .ok_or_else(|| anyhow::anyhow!("Category '{}' not found", name_or_id))
}

/// Prompt the user with retry on parse errors.
fn prompt_with_retry<T, F>(prompt: &str, parse: F) -> Result<T>
where
    F: Fn(&str) -> Result<T>,
{
    loop {
        let input: String = Input::new().with_prompt(prompt).interact_text()?;
        match parse(&input) {
            Ok(result) => return Ok(result),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

/// Prompt for a length or end time; empty input leaves the event without an end.
fn prompt_length(start: chrono::NaiveDateTime) -> Result<Option<chrono::Duration>> {
    loop {
        let input: String = Input::new()
            .with_prompt("  How long? (skip)")
            .default(String::new())
            .show_default(false)
            .interact_text()?;
        if input.is_empty() {
            return Ok(None);
        }
        match parse_end(&input, start) {
            Ok(length) => return Ok(Some(length)),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}
