use anyhow::Result;
use daybook_core::calendar::Calendar;
use daybook_core::daybook::Daybook;
use daybook_core::recurrence::{IntervalUnit, RecurrenceRequest, TemplateFields};
use owo_colors::OwoColorize;

use crate::commands::new::find_category;
use crate::render::pluralize;
use crate::utils::datetime::{When, parse_length, parse_when};

pub struct NewRecurrence {
    pub title: String,
    pub start: String,
    pub every: IntervalUnit,
    pub interval: u32,
    pub count: u32,
    pub triggered: bool,
    pub duration: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub untimed: bool,
}

pub fn run(daybook: &Daybook, calendar: &Calendar, args: NewRecurrence) -> Result<()> {
    let tz = daybook.tz();
    let when = parse_when(&args.start)?;
    let (anchor, time_status) = when.to_event_start(&tz, args.untimed);

    let duration_minutes = match (&args.duration, when) {
        (Some(input), When::At(_)) => Some(parse_length(input)?.num_minutes()),
        (Some(_), When::On(_)) => anyhow::bail!("--duration needs a start time, not just a day"),
        (None, _) => None,
    };

    let mut template = TemplateFields::new(args.title);
    template.time_status = time_status;
    template.duration_minutes = duration_minutes;
    template.location = args.location;
    template.category_id = match args.category {
        Some(name) => Some(find_category(calendar, &name)?),
        None => None,
    };

    let request = RecurrenceRequest {
        anchor,
        interval: args.every,
        interval_count: args.interval,
        occurrence_count: args.count,
        triggered: args.triggered,
        template,
    };

    let (rule, expansion) = calendar.create_recurrence(request, &tz)?;

    println!(
        "{}",
        format!(
            "  Created {} {} of {}",
            expansion.count(),
            pluralize("event", expansion.count()),
            rule.template.title
        )
        .green()
    );
    if let Some(end) = rule.recurrence_end {
        let local = end.with_timezone(&tz);
        println!("{}", format!("  Last one: {}", local.format("%a %b %-d %Y, %H:%M")).dimmed());
    }

    Ok(())
}
