//! First-fit lane packing for a single day's timed events.
//!
//! Each event is placed, in input order, into the lowest-numbered lane whose
//! occupants do not overlap it. Placed events are never moved again, so the
//! result depends on input order and is not necessarily the densest packing.

use std::ops::Range;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{SLOT_MINUTES, SLOTS_PER_DAY};
use crate::event::Event;
use crate::time::to_local;

/// Something that can be laid out on the time grid.
pub trait Placeable {
    fn id(&self) -> &str;

    /// Start and effective end, or `None` when the item has no place on the
    /// time grid (untimed, or missing its start).
    fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)>;
}

impl Placeable for Event {
    fn id(&self) -> &str {
        &self.id
    }

    fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.is_timed()
            .then(|| (self.datetime, self.effective_end()))
    }
}

/// How two events are judged to overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapMode {
    /// Events overlap when they touch a common 30-minute slot.
    #[default]
    Slot,
    /// Events overlap when their half-open intervals intersect.
    Continuous,
}

/// An event placed in a lane
#[derive(Debug)]
pub struct Placed<'a, T> {
    pub item: &'a T,
    pub lane: usize,
    /// Slots covered within the day, end exclusive
    pub slots: Range<usize>,
}

impl<T> Clone for Placed<'_, T> {
    fn clone(&self) -> Self {
        Placed {
            item: self.item,
            lane: self.lane,
            slots: self.slots.clone(),
        }
    }
}

/// Lane assignment for one day
#[derive(Debug)]
pub struct DayLayout<'a, T> {
    pub date: NaiveDate,
    /// Events per lane, in placement order
    pub lanes: Vec<Vec<Placed<'a, T>>>,
    /// Inputs that could not be placed
    pub skipped: Vec<&'a T>,
}

impl<'a, T: Placeable> DayLayout<'a, T> {
    /// Highest lane index in use, `None` when nothing was placed.
    pub fn max_lane(&self) -> Option<usize> {
        self.lanes.len().checked_sub(1)
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn lane_of(&self, id: &str) -> Option<usize> {
        self.placed().find(|p| p.item.id() == id).map(|p| p.lane)
    }

    pub fn placed(&self) -> impl Iterator<Item = &Placed<'a, T>> {
        self.lanes.iter().flatten()
    }
}

struct Lane {
    slots: Vec<bool>,
    spans: Vec<(DateTime<Utc>, DateTime<Utc>)>,
}

impl Lane {
    fn new() -> Self {
        Lane {
            slots: vec![false; SLOTS_PER_DAY],
            spans: Vec::new(),
        }
    }

    fn fits(&self, slots: &Range<usize>, span: (DateTime<Utc>, DateTime<Utc>), mode: OverlapMode) -> bool {
        match mode {
            OverlapMode::Slot => !self.slots[slots.clone()].iter().any(|taken| *taken),
            OverlapMode::Continuous => !self
                .spans
                .iter()
                .any(|(start, end)| *start < span.1 && span.0 < *end),
        }
    }

    fn occupy(&mut self, slots: &Range<usize>, span: (DateTime<Utc>, DateTime<Utc>)) {
        for slot in &mut self.slots[slots.clone()] {
            *slot = true;
        }
        self.spans.push(span);
    }
}

/// Assign each timed item to a lane for rendering `date` in `tz`.
///
/// Items are processed in the order given. An item goes to the first lane,
/// counting from 0, where it overlaps nothing already placed. Items without
/// a span, or whose span misses the day entirely, are skipped.
pub fn pack_day<'a, T, I>(items: I, date: NaiveDate, tz: &Tz, mode: OverlapMode) -> DayLayout<'a, T>
where
    T: Placeable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut lanes: Vec<Lane> = Vec::new();
    let mut placed: Vec<Vec<Placed<'a, T>>> = Vec::new();
    let mut skipped = Vec::new();

    for item in items {
        let Some((start, end)) = item.span() else {
            tracing::debug!(id = item.id(), "skipping item without a time span");
            skipped.push(item);
            continue;
        };

        let Some(slots) = slot_range(start, end, date, tz) else {
            tracing::debug!(id = item.id(), %date, "skipping item outside the day");
            skipped.push(item);
            continue;
        };

        // Zero or negative spans still take up one slot's worth of time
        let span = if end > start {
            (start, end)
        } else {
            (start, start + Duration::minutes(SLOT_MINUTES))
        };

        let lane = match lanes.iter().position(|l| l.fits(&slots, span, mode)) {
            Some(lane) => lane,
            None => {
                lanes.push(Lane::new());
                placed.push(Vec::new());
                lanes.len() - 1
            }
        };

        lanes[lane].occupy(&slots, span);
        placed[lane].push(Placed { item, lane, slots });
    }

    DayLayout {
        date,
        lanes: placed,
        skipped,
    }
}

/// Slots of `date` touched by `[start, end)`, at least one slot wide.
fn slot_range(start: DateTime<Utc>, end: DateTime<Utc>, date: NaiveDate, tz: &Tz) -> Option<Range<usize>> {
    let start_local = to_local(tz, start);
    let end_local = to_local(tz, end);

    if start_local.date() > date {
        return None;
    }
    let started_before = start_local.date() < date;

    let first = if started_before {
        0
    } else {
        minutes_into_day(start_local) / SLOT_MINUTES as usize
    };

    let last = if end_local.date() > date {
        SLOTS_PER_DAY
    } else if end_local.date() < date {
        0
    } else {
        minutes_into_day(end_local).div_ceil(SLOT_MINUTES as usize)
    };

    if started_before && last == 0 {
        return None;
    }

    let last = last.max(first + 1).min(SLOTS_PER_DAY);
    Some(first..last)
}

fn minutes_into_day(dt: NaiveDateTime) -> usize {
    (dt.hour() * 60 + dt.minute()) as usize
}
