use anyhow::Result;
use daybook_core::calendar::Calendar;
use daybook_core::daybook::Daybook;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::render::{pluralize, render_rule};

pub fn list(daybook: &Daybook, calendar: &Calendar) -> Result<()> {
    let tz = daybook.tz();
    let rules = calendar.recurrences()?;

    if rules.is_empty() {
        println!("{}", "No recurrences".dimmed());
        return Ok(());
    }

    let events = calendar.events()?;
    for rule in &rules {
        println!("{}", render_rule(rule, &tz, rule.live_end(&events)));
    }

    Ok(())
}

pub fn delete(calendar: &Calendar, id: &str, with_events: bool, force: bool) -> Result<()> {
    let rule = calendar
        .recurrences()?
        .into_iter()
        .find(|r| r.id.starts_with(id))
        .ok_or_else(|| anyhow::anyhow!("No recurrence '{}'", id))?;

    if !force {
        let prompt = if with_events {
            format!("Delete '{}' and all its events?", rule.template.title)
        } else {
            format!("Delete '{}'? Its events stay", rule.template.title)
        };
        if !Confirm::new().with_prompt(prompt).default(false).interact()? {
            return Ok(());
        }
    }

    let deleted = calendar.delete_recurrence(&rule.id, with_events)?;
    println!(
        "{}",
        format!(
            "  Deleted recurrence {} ({} {} removed)",
            rule.template.title,
            deleted,
            pluralize("event", deleted)
        )
        .red()
    );

    Ok(())
}
