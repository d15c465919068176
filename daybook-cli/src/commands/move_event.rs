use anyhow::{Context, Result};
use chrono::NaiveDate;
use daybook_core::calendar::Calendar;
use daybook_core::daybook::Daybook;
use daybook_core::reschedule::{DropTarget, plan_reschedule};
use daybook_core::snapshot::Snapshot;
use owo_colors::OwoColorize;

use crate::commands::find_event;
use crate::render::event_time;

/// Drop an event on `HH:MM`, `NO_TIME` or `ALL_DAY`, on `date` or the event's own day.
pub fn run(
    daybook: &Daybook,
    calendar: &Calendar,
    id: &str,
    target: &str,
    date: Option<NaiveDate>,
) -> Result<()> {
    let tz = daybook.tz();
    let target: DropTarget = target.parse()?;

    let mut event = find_event(calendar, id)?;
    let view_date = date.unwrap_or_else(|| event.local_date(&tz));

    let Some(patch) = plan_reschedule(&event, target, view_date, &tz) else {
        println!("{}", format!("{} is already there", event.title).dimmed());
        return Ok(());
    };

    let from = event_time(&event, &tz);
    let snapshot = Snapshot::apply(&mut event, |e| patch.apply_to(e));

    match calendar.update_event(&event) {
        Ok(saved) => snapshot.commit(&mut event, saved),
        Err(e) => {
            snapshot.rollback(&mut event);
            return Err(e).with_context(|| {
                format!("Could not move '{}'; it stays at {}", event.title, from)
            });
        }
    }

    tracing::debug!(event = %event.id, %target, "moved event");
    println!(
        "{}",
        format!(
            "  Moved {}: {} → {} {}",
            event.title,
            from,
            view_date.format("%a %b %-d"),
            event_time(&event, &tz)
        )
        .green()
    );

    Ok(())
}
