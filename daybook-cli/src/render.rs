//! TUI rendering traits for daybook types.
//!
//! Extension traits that add colored terminal rendering to daybook-core
//! types using owo_colors.

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use daybook_core::calendar::Calendar;
use daybook_core::category::Category;
use daybook_core::event::{Event, TimeStatus};
use daybook_core::layout::DayColumn;
use daybook_core::period::Period;
use daybook_core::recurrence::RecurrenceRule;
use daybook_core::time::to_local;
use owo_colors::OwoColorize;

/// Number of id characters shown next to events; enough to address them.
pub const SHORT_ID_LEN: usize = 8;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Calendar {
    fn render(&self) -> String {
        if self.name() == self.slug {
            format!("📅 {}", self.slug)
        } else {
            format!("📅 {} {}", self.name(), format!("({})", self.slug).dimmed())
        }
    }
}

impl Render for Category {
    fn render(&self) -> String {
        format!("{} {} {}", "●".color(hex_to_rgb(&self.color)), self.name, self.id.dimmed())
    }
}

impl Render for Period {
    fn render(&self) -> String {
        format!(
            "{} {} → {} ({} {}) {}",
            self.name.bold(),
            self.start,
            self.end,
            self.days(),
            pluralize("day", self.days() as usize),
            self.id.dimmed()
        )
    }
}

pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// Time column for an event: `HH:MM-HH:MM`, `all-day` or `no time`.
pub fn event_time(event: &Event, tz: &Tz) -> String {
    match event.time_status {
        TimeStatus::AllDay => "all-day".to_string(),
        TimeStatus::NoTime => "no time".to_string(),
        TimeStatus::Standard => {
            let start = to_local(tz, event.datetime).format("%H:%M");
            match event.end_datetime {
                Some(end) => format!("{}-{}", start, to_local(tz, end).format("%H:%M")),
                None => start.to_string(),
            }
        }
    }
}

/// One event line: time, title, location and short id.
pub fn event_line(event: &Event, tz: &Tz) -> String {
    let mut line = format!("{:>11}  {}", event_time(event, tz), event.title);
    if let Some(location) = &event.location {
        line.push_str(&format!(" {}", format!("@ {}", location).dimmed()));
    }
    if event.recursion_id.is_some() {
        line.push_str(&format!(" {}", "↻".cyan()));
    }
    line.push_str(&format!(" {}", short_id(&event.id).dimmed()));
    line
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// A day column: periods, untimed buckets, then timed events by lane.
pub fn render_day(column: &DayColumn<'_>, tz: &Tz, today: NaiveDate) -> String {
    let mut lines = vec![date_label(column.date, today).bold().to_string()];

    for period in &column.periods {
        lines.push(format!("  {}", format!("▌{}", period.name).magenta()));
    }
    for event in column.all_day.iter().chain(column.no_time.iter()) {
        lines.push(format!("  {}", event_line(event, tz)));
    }

    let mut timed: Vec<_> = column.timed.placed().collect();
    timed.sort_by_key(|p| (p.slots.start, p.lane));
    for placed in timed {
        let indent = "│ ".repeat(placed.lane);
        lines.push(format!("  {}{}", indent.dimmed(), event_line(placed.item, tz)));
    }

    if lines.len() == 1 {
        lines.push(format!("  {}", "Nothing planned".dimmed()));
    } else if column.timed.lane_count() > 1 {
        lines.push(format!(
            "  {}",
            format!("{} side-by-side lanes", column.timed.lane_count()).dimmed()
        ));
    }

    lines.join("\n")
}

/// Month grid with the number of events per day.
pub fn render_month(
    weeks: &[[NaiveDate; 7]],
    month: NaiveDate,
    counts: impl Fn(NaiveDate) -> usize,
    today: NaiveDate,
) -> String {
    let mut lines = vec![month.format("%B %Y").to_string().bold().to_string()];

    if let Some(first) = weeks.first() {
        let header: Vec<String> = first
            .iter()
            .map(|d| format!("{:<6}", d.format("%a").to_string()))
            .collect();
        lines.push(header.join("").dimmed().to_string());
    }

    for week in weeks {
        let cells: Vec<String> = week
            .iter()
            .map(|&day| {
                let count = counts(day);
                let mark = if count > 0 { format!("·{}", count) } else { String::new() };
                let cell = format!("{:<6}", format!("{:>2}{}", day.day(), mark));
                if day.month() != month.month() {
                    cell.dimmed().to_string()
                } else if day == today {
                    cell.reversed().to_string()
                } else {
                    cell
                }
            })
            .collect();
        lines.push(cells.join(""));
    }

    lines.join("\n")
}

pub fn render_rule(rule: &RecurrenceRule, tz: &Tz, live_end: Option<chrono::DateTime<chrono::Utc>>) -> String {
    let every = if rule.interval_count == 1 {
        format!("every {}", rule.interval)
    } else {
        format!("every {} {}s", rule.interval_count, rule.interval)
    };
    let count = if rule.triggered {
        "triggered".to_string()
    } else {
        format!("{} {}", rule.occurrence_count, pluralize("time", rule.occurrence_count as usize))
    };
    let end = match rule.recurrence_end {
        Some(end) => format!("until {}", to_local(tz, end).format("%Y-%m-%d %H:%M")),
        None => "unfinished".yellow().to_string(),
    };

    let mut line = format!(
        "{} {}, {}, {} {}",
        rule.template.title.bold(),
        every,
        count,
        end,
        short_id(&rule.id).dimmed()
    );
    if live_end != rule.recurrence_end {
        let live = match live_end {
            Some(end) => to_local(tz, end).format("%Y-%m-%d %H:%M").to_string(),
            None => "no events left".to_string(),
        };
        line.push_str(&format!(" {}", format!("(now {})", live).dimmed()));
    }
    line
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 { word.to_string() } else { format!("{}s", word) }
}

fn hex_to_rgb(hex: &str) -> owo_colors::Rgb {
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0)
    };
    owo_colors::Rgb(channel(1), channel(3), channel(5))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn time_column() {
        let start = Utc.with_ymd_and_hms(2026, 3, 20, 9, 0, 0).unwrap();
        let mut event = Event::new("Standup", start, TimeStatus::Standard);
        assert_eq!(event_time(&event, &Tz::UTC), "09:00");

        event.end_datetime = Some(start + chrono::Duration::minutes(45));
        assert_eq!(event_time(&event, &Tz::UTC), "09:00-09:45");

        event.time_status = TimeStatus::NoTime;
        assert_eq!(event_time(&event, &Tz::UTC), "no time");
    }

    #[test]
    fn relative_labels() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 24).unwrap();
        assert_eq!(date_label(today, today), "Today");
        assert_eq!(date_label(today.succ_opt().unwrap(), today), "Tomorrow");
        assert_eq!(
            date_label(NaiveDate::from_ymd_opt(2026, 2, 27).unwrap(), today),
            "Fri Feb 27"
        );
    }

    #[test]
    fn parses_category_colors() {
        let rgb = hex_to_rgb("#1e90ff");
        assert_eq!((rgb.0, rgb.1, rgb.2), (0x1e, 0x90, 0xff));
    }

    #[test]
    fn short_ids() {
        assert_eq!(short_id("0123456789"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
