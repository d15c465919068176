use chrono_tz::Tz;

use super::Calendar;
use super::metadata::{self, RECURRENCES_FILE, RecurrenceFile};
use crate::error::{DaybookError, DaybookResult};
use crate::recurrence::{Expansion, RecurrenceRequest, RecurrenceRule};

impl Calendar {
    pub fn recurrences(&self) -> DaybookResult<Vec<RecurrenceRule>> {
        let file: RecurrenceFile = metadata::load(&self.path, RECURRENCES_FILE)?;
        Ok(file.recurrences)
    }

    pub fn recurrence(&self, id: &str) -> DaybookResult<RecurrenceRule> {
        self.recurrences()?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| DaybookError::not_found("Recurrence", id))
    }

    fn save_recurrences(&self, recurrences: Vec<RecurrenceRule>) -> DaybookResult<()> {
        metadata::save(&self.path, RECURRENCES_FILE, &RecurrenceFile { recurrences })
    }

    /// Store a new rule and write every occurrence it generates.
    ///
    /// The request is validated before anything is written. The rule is
    /// stored first without an end; `recurrence_end` is only filled in once
    /// every occurrence has been written, so a failure part way through
    /// leaves it unset.
    pub fn create_recurrence(
        &self,
        request: RecurrenceRequest,
        tz: &Tz,
    ) -> DaybookResult<(RecurrenceRule, Expansion)> {
        let mut rule = RecurrenceRule::from_request(request)?;
        let expansion = rule.expand(tz)?;

        let mut recurrences = self.recurrences()?;
        recurrences.push(rule.clone());
        self.save_recurrences(recurrences.clone())?;

        for (index, event) in expansion.events.iter().enumerate() {
            if let Err(e) = self.create_event(event) {
                tracing::warn!(
                    rule = %rule.id,
                    written = index,
                    total = expansion.count(),
                    error = %e,
                    "recurrence generation stopped early"
                );
                return Err(e);
            }
        }

        rule.recurrence_end = expansion.recurrence_end;
        if let Some(stored) = recurrences.iter_mut().find(|r| r.id == rule.id) {
            stored.recurrence_end = rule.recurrence_end;
        }
        self.save_recurrences(recurrences)?;

        tracing::info!(
            calendar = %self.slug,
            rule = %rule.id,
            count = expansion.count(),
            "created recurrence"
        );
        Ok((rule, expansion))
    }

    /// Remove a rule. With `with_events`, its generated events go too;
    /// otherwise they stay and keep their `recursion_id`.
    ///
    /// Returns the number of events deleted.
    pub fn delete_recurrence(&self, id: &str, with_events: bool) -> DaybookResult<usize> {
        let mut recurrences = self.recurrences()?;
        let before = recurrences.len();
        recurrences.retain(|r| r.id != id);
        if recurrences.len() == before {
            return Err(DaybookError::not_found("Recurrence", id));
        }
        self.save_recurrences(recurrences)?;

        let mut deleted = 0;
        if with_events {
            for event in self.events()? {
                if event.recursion_id.as_deref() == Some(id) {
                    self.delete_event(&event.id)?;
                    deleted += 1;
                }
            }
        }

        tracing::info!(calendar = %self.slug, rule = %id, deleted, "deleted recurrence");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{at, temp_calendar};
    use crate::error::DaybookError;
    use crate::recurrence::{IntervalUnit, RecurrenceRequest, TemplateFields};
    use chrono_tz::Tz;

    fn weekly(count: u32) -> RecurrenceRequest {
        RecurrenceRequest {
            anchor: at(2026, 1, 5, 9, 0),
            interval: IntervalUnit::Week,
            interval_count: 1,
            occurrence_count: count,
            triggered: false,
            template: TemplateFields::new("Gym"),
        }
    }

    #[test]
    fn creates_rule_and_events() {
        let (_dir, calendar) = temp_calendar();

        let (rule, expansion) = calendar.create_recurrence(weekly(3), &Tz::UTC).unwrap();

        assert_eq!(expansion.count(), 3);
        assert_eq!(rule.recurrence_end, Some(at(2026, 1, 19, 9, 0)));

        let stored = calendar.recurrence(&rule.id).unwrap();
        assert_eq!(stored.recurrence_end, Some(at(2026, 1, 19, 9, 0)));

        let events = calendar.events().unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.recursion_id.as_deref() == Some(rule.id.as_str())));
        assert_eq!(rule.live_end(&events), rule.recurrence_end);
    }

    #[test]
    fn invalid_counts_write_nothing() {
        let (_dir, calendar) = temp_calendar();

        for count in [0, 366] {
            assert!(matches!(
                calendar.create_recurrence(weekly(count), &Tz::UTC),
                Err(DaybookError::Validation(_))
            ));
        }

        assert!(calendar.recurrences().unwrap().is_empty());
        assert!(calendar.events().unwrap().is_empty());
    }

    #[test]
    fn failure_part_way_keeps_rule_without_end() {
        let (_dir, calendar) = temp_calendar();

        // Every name the third occurrence could take is occupied.
        let base = "2026-01-19T0900__gym";
        std::fs::write(calendar.path.join(format!("{base}.ics")), "junk").unwrap();
        for n in 2..=100 {
            std::fs::write(calendar.path.join(format!("{base}-{n}.ics")), "junk").unwrap();
        }

        assert!(calendar.create_recurrence(weekly(4), &Tz::UTC).is_err());

        let rules = calendar.recurrences().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].recurrence_end, None);

        let events = calendar.events().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].datetime, at(2026, 1, 5, 9, 0));
        assert_eq!(events[1].datetime, at(2026, 1, 12, 9, 0));
    }

    #[test]
    fn triggered_rule_writes_one_event() {
        let (_dir, calendar) = temp_calendar();
        let mut request = weekly(10);
        request.triggered = true;

        let (rule, _) = calendar.create_recurrence(request, &Tz::UTC).unwrap();

        assert_eq!(calendar.events().unwrap().len(), 1);
        assert_eq!(rule.recurrence_end, Some(at(2026, 1, 5, 9, 0)));
    }

    #[test]
    fn delete_keeps_or_removes_events() {
        let (_dir, calendar) = temp_calendar();
        let (kept, _) = calendar.create_recurrence(weekly(2), &Tz::UTC).unwrap();
        let (removed, _) = calendar.create_recurrence(weekly(3), &Tz::UTC).unwrap();

        assert_eq!(calendar.delete_recurrence(&kept.id, false).unwrap(), 0);
        assert_eq!(calendar.delete_recurrence(&removed.id, true).unwrap(), 3);

        assert!(calendar.recurrences().unwrap().is_empty());
        let events = calendar.events().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.recursion_id.as_deref() == Some(kept.id.as_str())));

        assert!(calendar.delete_recurrence(&kept.id, false).is_err());
    }
}
