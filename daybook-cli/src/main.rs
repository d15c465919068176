mod commands;
mod render;
mod utils;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use daybook_core::date_range::DateRange;
use daybook_core::daybook::Daybook;
use daybook_core::daybook_config::DaybookConfig;
use daybook_core::recurrence::IntervalUnit;
use tracing_subscriber::EnvFilter;

use crate::utils::datetime::parse_day;

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Plan your days: events, recurrences and day/week/month views")]
struct Cli {
    /// Operate on this calendar (by slug); defaults to the configured one
    #[arg(short, long, global = true)]
    calendar: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List calendars
    Calendars,
    /// Create a calendar
    Init {
        name: String,

        /// Display colour (#RRGGBB)
        #[arg(long)]
        color: Option<String>,
    },
    /// Create an event (prompts for anything missing)
    New {
        title: Option<String>,

        /// Start, e.g. "2026-03-20T15:00", "tomorrow 3pm" or "friday"
        #[arg(short, long)]
        start: Option<String>,

        /// End or length, e.g. "45m", "until 5pm"
        #[arg(short, long)]
        end: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        /// Category name or id
        #[arg(long)]
        category: Option<String>,

        /// Put a day-only event in the "no time" bucket instead of all-day
        #[arg(long)]
        no_time: bool,
    },
    /// Create a repeating event
    Recur {
        title: String,

        /// First occurrence
        #[arg(short, long)]
        start: String,

        /// day, week, month or year
        #[arg(long)]
        every: IntervalUnit,

        /// Units between occurrences
        #[arg(long, default_value_t = 1)]
        interval: u32,

        /// Number of occurrences (1-365)
        #[arg(short = 'n', long)]
        count: u32,

        /// Create only the first occurrence
        #[arg(long)]
        triggered: bool,

        /// Length of each occurrence, e.g. "1h"
        #[arg(short, long)]
        duration: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        no_time: bool,
    },
    /// List upcoming events
    Events {
        /// From this date (YYYY-MM-DD, or "start" for all past events)
        #[arg(long)]
        from: Option<String>,

        /// Until this date (YYYY-MM-DD, or "end")
        #[arg(long)]
        to: Option<String>,
    },
    /// Show one day with overlapping events side by side
    Day { date: Option<String> },
    /// Show the week containing a date
    Week { date: Option<String> },
    /// Show the month containing a date
    Month { date: Option<String> },
    /// Move an event to a time (HH:MM) or a bucket (NO_TIME, ALL_DAY)
    Move {
        id: String,
        target: String,

        /// Day to move to; defaults to the event's current day
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete an event
    Delete {
        id: String,

        #[arg(short, long)]
        force: bool,
    },
    /// List or delete recurrence rules
    Recurrences {
        /// Delete the rule with this id (or id prefix)
        #[arg(long)]
        delete: Option<String>,

        /// Also delete the events the rule generated
        #[arg(long, requires = "delete")]
        with_events: bool,

        #[arg(short, long)]
        force: bool,
    },
    /// Manage event categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage periods (vacations, trips)
    Period {
        #[command(subcommand)]
        action: PeriodAction,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    Add { name: String, color: String },
    List,
    Delete { name_or_id: String },
}

#[derive(Subcommand)]
enum PeriodAction {
    Add {
        name: String,
        start: String,
        end: String,

        #[arg(long)]
        category: Option<String>,
    },
    List,
    Delete { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = DaybookConfig::load()?;
    init_tracing(&config.log_level, cli.verbose);
    let daybook = Daybook::from_config(config)?;

    let today = Utc::now().with_timezone(&daybook.tz()).date_naive();
    let slug = cli.calendar.as_deref();

    match cli.command {
        Commands::Calendars => commands::calendars::run(&daybook),
        Commands::Init { name, color } => commands::init::run(daybook, &name, color),
        Commands::New {
            title,
            start,
            end,
            location,
            category,
            no_time,
        } => {
            let calendar = daybook.resolve_calendar(slug)?;
            let args = commands::new::NewEvent {
                title,
                start,
                end,
                location,
                category,
                untimed: no_time,
            };
            commands::new::run(&daybook, &calendar, args)
        }
        Commands::Recur {
            title,
            start,
            every,
            interval,
            count,
            triggered,
            duration,
            location,
            category,
            no_time,
        } => {
            let calendar = daybook.resolve_calendar(slug)?;
            let args = commands::recur::NewRecurrence {
                title,
                start,
                every,
                interval,
                count,
                triggered,
                duration,
                location,
                category,
                untimed: no_time,
            };
            commands::recur::run(&daybook, &calendar, args)
        }
        Commands::Events { from, to } => {
            let calendars = match slug {
                Some(slug) => vec![daybook.calendar(slug)?],
                None => daybook.calendars(),
            };
            let range = DateRange::from_args(from.as_deref(), to.as_deref(), today, &daybook.tz())?;
            commands::events::run(&daybook, calendars, range)
        }
        Commands::Day { date } => {
            let calendar = daybook.resolve_calendar(slug)?;
            commands::views::day(&daybook, &calendar, parse_day(date.as_deref(), today)?)
        }
        Commands::Week { date } => {
            let calendar = daybook.resolve_calendar(slug)?;
            commands::views::week(&daybook, &calendar, parse_day(date.as_deref(), today)?)
        }
        Commands::Month { date } => {
            let calendar = daybook.resolve_calendar(slug)?;
            commands::views::month(&daybook, &calendar, parse_day(date.as_deref(), today)?)
        }
        Commands::Move { id, target, date } => {
            let calendar = daybook.resolve_calendar(slug)?;
            let date = date.map(|d| parse_day(Some(d.as_str()), today)).transpose()?;
            commands::move_event::run(&daybook, &calendar, &id, &target, date)
        }
        Commands::Delete { id, force } => {
            let calendar = daybook.resolve_calendar(slug)?;
            commands::delete::run(&daybook, &calendar, &id, force)
        }
        Commands::Recurrences {
            delete,
            with_events,
            force,
        } => {
            let calendar = daybook.resolve_calendar(slug)?;
            match delete {
                Some(id) => commands::recurrences::delete(&calendar, &id, with_events, force),
                None => commands::recurrences::list(&daybook, &calendar),
            }
        }
        Commands::Category { action } => {
            let calendar = daybook.resolve_calendar(slug)?;
            match action {
                CategoryAction::Add { name, color } => commands::category::add(&calendar, &name, &color),
                CategoryAction::List => commands::category::list(&calendar),
                CategoryAction::Delete { name_or_id } => commands::category::delete(&calendar, &name_or_id),
            }
        }
        Commands::Period { action } => {
            let calendar = daybook.resolve_calendar(slug)?;
            match action {
                PeriodAction::Add {
                    name,
                    start,
                    end,
                    category,
                } => commands::period::add(&calendar, &name, &start, &end, category.as_deref()),
                PeriodAction::List => commands::period::list(&calendar),
                PeriodAction::Delete { id } => commands::period::delete(&calendar, &id),
            }
        }
    }
}

/// Logs go to stderr; `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str, verbose: bool) {
    let fallback = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_recur_flags() {
        let cli = Cli::try_parse_from([
            "daybook", "recur", "Gym", "--start", "2026-01-05T07:00", "--every", "weekly", "-n", "10",
        ])
        .unwrap();

        let Commands::Recur { every, count, interval, .. } = cli.command else {
            panic!("expected recur");
        };
        assert_eq!(every, IntervalUnit::Week);
        assert_eq!(count, 10);
        assert_eq!(interval, 1);
    }

    #[test]
    fn with_events_requires_delete() {
        assert!(Cli::try_parse_from(["daybook", "recurrences", "--with-events"]).is_err());
    }
}
