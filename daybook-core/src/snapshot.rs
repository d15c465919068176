//! Optimistic updates as explicit before/after values.
//!
//! A caller patches its in-memory state right away, sends the change to the
//! store, and then either commits the authoritative result or rolls back to
//! the exact value it had before.

/// The state captured before an optimistic change
#[derive(Debug, Clone)]
pub struct Snapshot<T: Clone> {
    before: T,
}

impl<T: Clone> Snapshot<T> {
    /// Record `state`, then patch it in place with `f`.
    pub fn apply(state: &mut T, f: impl FnOnce(&mut T)) -> Self {
        let before = state.clone();
        f(state);
        Snapshot { before }
    }

    pub fn before(&self) -> &T {
        &self.before
    }

    /// Restore the captured value verbatim.
    pub fn rollback(self, state: &mut T) {
        *state = self.before;
    }

    /// Replace the optimistic value with the one the store returned.
    pub fn commit(self, state: &mut T, reconciled: T) {
        *state = reconciled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, TimeStatus};
    use crate::reschedule::{DropTarget, plan_reschedule};
    use chrono::{NaiveDate, TimeZone, Utc};
    use chrono_tz::Tz;

    fn events() -> Vec<Event> {
        vec![
            Event::new("A", Utc.with_ymd_and_hms(2026, 4, 14, 9, 0, 0).unwrap(), TimeStatus::Standard),
            Event::new("B", Utc.with_ymd_and_hms(2026, 4, 14, 11, 0, 0).unwrap(), TimeStatus::Standard),
        ]
    }

    #[test]
    fn rollback_restores_previous_list() {
        let mut list = events();
        let original = list.clone();
        let view = NaiveDate::from_ymd_opt(2026, 4, 14).unwrap();
        let patch = plan_reschedule(&list[1], DropTarget::NoTime, view, &Tz::UTC).unwrap();

        let snapshot = Snapshot::apply(&mut list, |list| patch.apply_to(&mut list[1]));
        assert_eq!(list[1].time_status, TimeStatus::NoTime);

        snapshot.rollback(&mut list);
        assert_eq!(list, original);
    }

    #[test]
    fn commit_takes_reconciled_value() {
        let mut list = events();
        let snapshot = Snapshot::apply(&mut list, |list| list[0].title = "optimistic".into());
        assert_eq!(snapshot.before()[0].title, "A");

        let mut server = list.clone();
        server[0].title = "from store".into();
        snapshot.commit(&mut list, server);
        assert_eq!(list[0].title, "from store");
    }
}
