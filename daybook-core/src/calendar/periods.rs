use chrono::NaiveDate;

use super::Calendar;
use super::metadata::{self, PERIODS_FILE, PeriodFile};
use crate::error::{DaybookError, DaybookResult};
use crate::period::Period;

impl Calendar {
    /// All periods, ordered by start day.
    pub fn periods(&self) -> DaybookResult<Vec<Period>> {
        let file: PeriodFile = metadata::load(&self.path, PERIODS_FILE)?;
        let mut periods = file.periods;
        periods.sort_by_key(|p| p.start);
        Ok(periods)
    }

    /// Periods touching any day in `[from, to]`.
    pub fn periods_between(&self, from: NaiveDate, to: NaiveDate) -> DaybookResult<Vec<Period>> {
        let mut periods = self.periods()?;
        periods.retain(|p| p.overlaps(from, to));
        Ok(periods)
    }

    pub(super) fn save_periods(&self, periods: Vec<Period>) -> DaybookResult<()> {
        metadata::save(&self.path, PERIODS_FILE, &PeriodFile { periods })
    }

    pub fn add_period(&self, period: Period) -> DaybookResult<Period> {
        period.validate()?;
        if let Some(category_id) = &period.category_id {
            self.category(category_id)?;
        }

        let mut periods = self.periods()?;
        periods.push(period.clone());
        self.save_periods(periods)?;

        tracing::info!(calendar = %self.slug, period = %period.name, "added period");
        Ok(period)
    }

    pub fn delete_period(&self, id: &str) -> DaybookResult<Period> {
        let mut periods = self.periods()?;
        let index = periods
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DaybookError::not_found("Period", id))?;
        let removed = periods.remove(index);
        self.save_periods(periods)?;
        Ok(removed)
    }
}
