use super::Calendar;
use super::metadata::{self, CATEGORIES_FILE, CategoryFile};
use crate::category::Category;
use crate::error::{DaybookError, DaybookResult};

impl Calendar {
    pub fn categories(&self) -> DaybookResult<Vec<Category>> {
        let file: CategoryFile = metadata::load(&self.path, CATEGORIES_FILE)?;
        Ok(file.categories)
    }

    pub fn category(&self, id: &str) -> DaybookResult<Category> {
        self.categories()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| DaybookError::not_found("Category", id))
    }

    pub fn add_category(&self, category: Category) -> DaybookResult<Category> {
        category.validate()?;

        let mut categories = self.categories()?;
        if categories
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(&category.name))
        {
            return Err(DaybookError::validation(format!(
                "Category '{}' already exists",
                category.name
            )));
        }

        categories.push(category.clone());
        metadata::save(&self.path, CATEGORIES_FILE, &CategoryFile { categories })?;

        tracing::info!(calendar = %self.slug, category = %category.name, "added category");
        Ok(category)
    }

    /// Remove a category and clear it from every event and period that used it.
    ///
    /// Returns the number of events updated.
    pub fn delete_category(&self, id: &str) -> DaybookResult<usize> {
        let mut categories = self.categories()?;
        let before = categories.len();
        categories.retain(|c| c.id != id);
        if categories.len() == before {
            return Err(DaybookError::not_found("Category", id));
        }
        metadata::save(&self.path, CATEGORIES_FILE, &CategoryFile { categories })?;

        let mut cleared = 0;
        for mut event in self.events()? {
            if event.category_id.as_deref() == Some(id) {
                event.category_id = None;
                self.update_event(&event)?;
                cleared += 1;
            }
        }

        let mut periods = self.periods()?;
        let mut periods_changed = false;
        for period in periods.iter_mut().filter(|p| p.category_id.as_deref() == Some(id)) {
            period.category_id = None;
            periods_changed = true;
        }
        if periods_changed {
            self.save_periods(periods)?;
        }

        tracing::info!(calendar = %self.slug, category = %id, cleared, "deleted category");
        Ok(cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{at, temp_calendar};
    use crate::category::Category;
    use crate::event::{Event, TimeStatus};
    use crate::period::Period;
    use chrono::NaiveDate;

    #[test]
    fn names_are_unique_ignoring_case() {
        let (_dir, calendar) = temp_calendar();
        calendar.add_category(Category::new("Work", "#0000ff").unwrap()).unwrap();

        assert!(calendar.add_category(Category::new("work", "#00ff00").unwrap()).is_err());
        assert_eq!(calendar.categories().unwrap().len(), 1);
    }

    #[test]
    fn deleting_clears_references() {
        let (_dir, calendar) = temp_calendar();
        let work = calendar.add_category(Category::new("Work", "#0000ff").unwrap()).unwrap();

        let mut tagged = Event::new("Review", at(2026, 6, 1, 10, 0), TimeStatus::Standard);
        tagged.category_id = Some(work.id.clone());
        calendar.create_event(&tagged).unwrap();
        calendar
            .create_event(&Event::new("Lunch", at(2026, 6, 1, 12, 0), TimeStatus::Standard))
            .unwrap();

        let mut period = Period::new(
            "Crunch",
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 5).unwrap(),
        )
        .unwrap();
        period.category_id = Some(work.id.clone());
        calendar.add_period(period).unwrap();

        assert_eq!(calendar.delete_category(&work.id).unwrap(), 1);

        assert!(calendar.categories().unwrap().is_empty());
        assert!(calendar.events().unwrap().iter().all(|e| e.category_id.is_none()));
        assert!(calendar.periods().unwrap()[0].category_id.is_none());
        assert!(calendar.delete_category(&work.id).is_err());
    }
}
