//! Day, week and month views.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use daybook_core::calendar::Calendar;
use daybook_core::daybook::Daybook;
use daybook_core::layout::{WeekGrid, build_day, month_weeks};

use crate::render::{render_day, render_month};

fn today(daybook: &Daybook) -> NaiveDate {
    Utc::now().with_timezone(&daybook.tz()).date_naive()
}

pub fn day(daybook: &Daybook, calendar: &Calendar, date: NaiveDate) -> Result<()> {
    let tz = daybook.tz();
    let config = daybook.config();

    let events = calendar.events_between(date, date, &tz)?;
    let periods = calendar.periods_between(date, date)?;
    let column = build_day(date, &events, &periods, &tz, config.overlap);

    println!("{}", render_day(&column, &tz, today(daybook)));
    Ok(())
}

pub fn week(daybook: &Daybook, calendar: &Calendar, date: NaiveDate) -> Result<()> {
    let tz = daybook.tz();
    let config = daybook.config();

    let first = config.week_start.week_of(date);
    let last = first + chrono::Duration::days(6);
    let events = calendar.events_between(first, last, &tz)?;
    let periods = calendar.periods_between(first, last)?;

    let grid = WeekGrid::build(date, config.week_start, &events, &periods, &tz, config.overlap);
    let today = today(daybook);

    let days: Vec<String> = grid.days.iter().map(|d| render_day(d, &tz, today)).collect();
    println!("{}", days.join("\n\n"));
    Ok(())
}

pub fn month(daybook: &Daybook, calendar: &Calendar, date: NaiveDate) -> Result<()> {
    let tz = daybook.tz();
    let weeks = month_weeks(date, daybook.config().week_start);

    let (Some(first), Some(last)) = (weeks.first(), weeks.last()) else {
        return Ok(());
    };
    let events = calendar.events_between(first[0], last[6], &tz)?;

    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
    for event in &events {
        *counts.entry(event.local_date(&tz)).or_default() += 1;
    }

    println!(
        "{}",
        render_month(
            &weeks,
            date,
            |d| counts.get(&d).copied().unwrap_or(0),
            today(daybook)
        )
    );
    Ok(())
}
