//! Core of daybook: a personal calendar kept as plain `.ics` files.
//!
//! - `event`, `category`, `period` are the stored data types
//! - `recurrence` expands interval rules into concrete events
//! - `layout` packs timed events into lanes for day, week and month views
//! - `reschedule` and `snapshot` turn a drop on a view into an event update
//! - `daybook` and `calendar` are the on-disk store

pub mod calendar;
pub mod category;
pub mod constants;
pub mod date_range;
pub mod daybook;
pub mod daybook_config;
pub mod error;
pub mod event;
pub mod ics;
pub mod layout;
pub mod period;
pub mod recurrence;
pub mod reschedule;
pub mod snapshot;
pub mod time;

pub use calendar::{Calendar, Rescheduled};
pub use category::Category;
pub use date_range::DateRange;
pub use daybook::Daybook;
pub use daybook_config::DaybookConfig;
pub use error::{DaybookError, DaybookResult};
pub use event::{Event, TimeStatus};
pub use period::Period;
pub use recurrence::{Expansion, IntervalUnit, RecurrenceRequest, RecurrenceRule, TemplateFields};
pub use reschedule::{DropTarget, EventPatch, plan_reschedule};
pub use snapshot::Snapshot;
