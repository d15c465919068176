//! Date periods (vacations, trips) shown across the views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DaybookError, DaybookResult};

/// A named, inclusive range of days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub id: String,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

impl Period {
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> DaybookResult<Self> {
        let period = Period {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into().trim().to_string(),
            start,
            end,
            category_id: None,
        };
        period.validate()?;
        Ok(period)
    }

    pub fn validate(&self) -> DaybookResult<()> {
        if self.name.is_empty() {
            return Err(DaybookError::validation("Period name cannot be empty"));
        }
        if self.end < self.start {
            return Err(DaybookError::validation(format!(
                "Period ends ({}) before it starts ({})",
                self.end, self.start
            )));
        }
        Ok(())
    }

    /// Whether any day of this period falls within `[from, to]`.
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.start <= to && from <= self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.overlaps(date, date)
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
