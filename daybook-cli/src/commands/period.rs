use anyhow::Result;
use daybook_core::calendar::Calendar;
use daybook_core::period::Period;
use owo_colors::OwoColorize;

use crate::commands::new::find_category;
use crate::render::Render;
use crate::utils::datetime::parse_when;

pub fn add(
    calendar: &Calendar,
    name: &str,
    start: &str,
    end: &str,
    category: Option<&str>,
) -> Result<()> {
    let mut period = Period::new(name, parse_when(start)?.date(), parse_when(end)?.date())?;
    if let Some(category) = category {
        period.category_id = Some(find_category(calendar, category)?);
    }

    let period = calendar.add_period(period)?;
    println!("  Added {}", period.render());
    Ok(())
}

pub fn list(calendar: &Calendar) -> Result<()> {
    let periods = calendar.periods()?;

    if periods.is_empty() {
        println!("{}", "No periods".dimmed());
    }
    for period in &periods {
        println!("  {}", period.render());
    }

    Ok(())
}

pub fn delete(calendar: &Calendar, id: &str) -> Result<()> {
    let removed = calendar.delete_period(id)?;
    println!("{}", format!("  Deleted period {}", removed.name).red());
    Ok(())
}
