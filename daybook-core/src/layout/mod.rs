//! Day, week and month grid layout.
//!
//! Layout is recomputed from scratch on every render and never persisted.

mod day;
mod week;

pub use day::{DayLayout, OverlapMode, Placeable, Placed, pack_day};
pub use week::{DayColumn, WeekGrid, WeekStart, build_day, month_weeks};
