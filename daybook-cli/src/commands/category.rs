use anyhow::Result;
use daybook_core::calendar::Calendar;
use daybook_core::category::Category;
use owo_colors::OwoColorize;

use crate::render::{Render, pluralize};

pub fn add(calendar: &Calendar, name: &str, color: &str) -> Result<()> {
    let category = calendar.add_category(Category::new(name, color)?)?;
    println!("  Added {}", category.render());
    Ok(())
}

pub fn list(calendar: &Calendar) -> Result<()> {
    let categories = calendar.categories()?;

    if categories.is_empty() {
        println!("{}", "No categories".dimmed());
    }
    for category in &categories {
        println!("  {}", category.render());
    }

    Ok(())
}

pub fn delete(calendar: &Calendar, name_or_id: &str) -> Result<()> {
    let id = crate::commands::new::find_category(calendar, name_or_id)?;
    let cleared = calendar.delete_category(&id)?;
    println!(
        "{}",
        format!(
            "  Deleted category ({} {} cleared)",
            cleared,
            pluralize("event", cleared)
        )
        .red()
    );
    Ok(())
}
