//! Day and week views: untimed buckets plus timed events packed into lanes

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use chrono::{Duration, NaiveDate};
use daybook_core::event::Event;
use daybook_core::layout::{DayColumn, WeekGrid, build_day};
use daybook_core::period::Period;
use serde::Serialize;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calendars/{slug}/days/{date}", get(day_view))
        .route("/calendars/{slug}/weeks/{date}", get(week_view))
}

#[derive(Serialize)]
pub struct PlacedEvent {
    pub lane: usize,
    /// First 30-minute slot covered
    pub start_slot: usize,
    /// Slot after the last one covered
    pub end_slot: usize,
    pub event: Event,
}

#[derive(Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub all_day: Vec<Event>,
    pub no_time: Vec<Event>,
    pub lanes: Vec<Vec<PlacedEvent>>,
    pub max_lane: Option<usize>,
    pub periods: Vec<Period>,
}

impl From<&DayColumn<'_>> for DayView {
    fn from(column: &DayColumn<'_>) -> Self {
        DayView {
            date: column.date,
            all_day: column.all_day.iter().map(|e| (*e).clone()).collect(),
            no_time: column.no_time.iter().map(|e| (*e).clone()).collect(),
            lanes: column
                .timed
                .lanes
                .iter()
                .map(|lane| {
                    lane.iter()
                        .map(|p| PlacedEvent {
                            lane: p.lane,
                            start_slot: p.slots.start,
                            end_slot: p.slots.end,
                            event: p.item.clone(),
                        })
                        .collect()
                })
                .collect(),
            max_lane: column.timed.max_lane(),
            periods: column.periods.iter().map(|p| (*p).clone()).collect(),
        }
    }
}

/// GET /calendars/{slug}/days/{date}
async fn day_view(
    State(state): State<AppState>,
    Path((slug, date)): Path<(String, NaiveDate)>,
) -> Result<Json<DayView>, AppError> {
    let calendar = state.calendar(&slug)?;
    let daybook = state.daybook();
    let tz = daybook.tz();

    let events = calendar.events_between(date, date, &tz)?;
    let periods = calendar.periods_between(date, date)?;
    let column = build_day(date, &events, &periods, &tz, daybook.config().overlap);

    Ok(Json(DayView::from(&column)))
}

/// GET /calendars/{slug}/weeks/{date} - The week containing `date`
async fn week_view(
    State(state): State<AppState>,
    Path((slug, date)): Path<(String, NaiveDate)>,
) -> Result<Json<Vec<DayView>>, AppError> {
    let calendar = state.calendar(&slug)?;
    let daybook = state.daybook();
    let config = daybook.config();
    let tz = daybook.tz();

    let first = config.week_start.week_of(date);
    let last = first + Duration::days(6);
    let events = calendar.events_between(first, last, &tz)?;
    let periods = calendar.periods_between(first, last)?;

    let grid = WeekGrid::build(date, config.week_start, &events, &periods, &tz, config.overlap);

    Ok(Json(grid.days.iter().map(DayView::from).collect()))
}
