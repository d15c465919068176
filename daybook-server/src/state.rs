use std::sync::Arc;

use anyhow::Result;
use daybook_core::calendar::Calendar;
use daybook_core::daybook::Daybook;

/// Shared application state
///
/// Only the loaded configuration is shared; calendars are read from disk on
/// every request to pick up changes made by the CLI.
#[derive(Clone)]
pub struct AppState {
    daybook: Arc<Daybook>,
}

impl AppState {
    pub fn new(daybook: Daybook) -> Self {
        AppState {
            daybook: Arc::new(daybook),
        }
    }

    pub fn daybook(&self) -> &Daybook {
        &self.daybook
    }

    pub fn calendar(&self, slug: &str) -> Result<Calendar> {
        Ok(self.daybook.calendar(slug)?)
    }
}
