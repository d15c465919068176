//! Event endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use daybook_core::calendar::Rescheduled;
use daybook_core::date_range::DateRange;
use daybook_core::event::{Event, TimeStatus};
use daybook_core::reschedule::DropTarget;
use serde::{Deserialize, Serialize};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calendars/{slug}/events", get(list_events).post(create_event))
        .route(
            "/calendars/{slug}/events/{id}",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route("/calendars/{slug}/events/{id}/drop", post(drop_event))
}

/// Optional day bounds, both inclusive
#[derive(Deserialize)]
pub struct RangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// GET /calendars/{slug}/events - List events, optionally within local days
async fn list_events(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<Event>>, AppError> {
    let calendar = state.calendar(&slug)?;
    let tz = state.daybook().tz();

    let range = match (query.from, query.to) {
        (Some(from), Some(to)) => DateRange::days(from, to, &tz),
        (from, to) => DateRange {
            from: from.and_then(|d| DateRange::day(d, &tz).from),
            to: to.and_then(|d| DateRange::day(d, &tz).to),
        },
    };

    Ok(Json(calendar.events_in_range(&range)?))
}

/// Request body for creating an event
#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub datetime: DateTime<Utc>,
    pub end_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_status: TimeStatus,
    pub location: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
}

/// POST /calendars/{slug}/events - Create a new event
async fn create_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let calendar = state.calendar(&slug)?;

    if let Some(category_id) = &req.category_id {
        calendar.category(category_id)?;
    }

    let mut event = Event::new(req.title, req.datetime, req.time_status);
    event.end_datetime = req.end_datetime;
    event.location = req.location;
    event.description = req.description;
    event.category_id = req.category_id;

    let event = calendar.create_event(&event)?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /calendars/{slug}/events/{id}
async fn get_event(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<Event>, AppError> {
    Ok(Json(state.calendar(&slug)?.event(&id)?))
}

/// Fields to change; absent fields are left alone. `null` clears an optional field.
#[derive(Deserialize, Default)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub datetime: Option<DateTime<Utc>>,
    #[serde(default, with = "double_option")]
    pub end_datetime: Option<Option<DateTime<Utc>>>,
    pub time_status: Option<TimeStatus>,
    #[serde(default, with = "double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub category_id: Option<Option<String>>,
}

/// Distinguishes a missing field (`None`) from an explicit `null` (`Some(None)`).
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// PATCH /calendars/{slug}/events/{id}
async fn update_event(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<Event>, AppError> {
    let calendar = state.calendar(&slug)?;
    let mut event = calendar.event(&id)?;

    if let Some(title) = req.title {
        event.title = title;
    }
    if let Some(datetime) = req.datetime {
        event.datetime = datetime;
    }
    if let Some(end) = req.end_datetime {
        event.end_datetime = end;
    }
    if let Some(status) = req.time_status {
        event.time_status = status;
    }
    if let Some(location) = req.location {
        event.location = location;
    }
    if let Some(description) = req.description {
        event.description = description;
    }
    if let Some(category_id) = req.category_id {
        if let Some(id) = &category_id {
            calendar.category(id)?;
        }
        event.category_id = category_id;
    }

    Ok(Json(calendar.update_event(&event)?))
}

/// DELETE /calendars/{slug}/events/{id}
async fn delete_event(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state.calendar(&slug)?.delete_event(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// A drop on a day view
#[derive(Deserialize)]
pub struct DropRequest {
    /// `HH:MM`, `NO_TIME` or `ALL_DAY`
    pub target: String,
    /// Day being viewed
    pub date: NaiveDate,
}

#[derive(Serialize)]
pub struct DropResponse {
    pub changed: bool,
    pub event: Event,
}

/// POST /calendars/{slug}/events/{id}/drop - Reschedule from a drop target
async fn drop_event(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
    Json(req): Json<DropRequest>,
) -> Result<Json<DropResponse>, AppError> {
    let target: DropTarget = req.target.parse()?;
    let calendar = state.calendar(&slug)?;

    let result = calendar.reschedule(&id, target, req.date, &state.daybook().tz())?;

    Ok(Json(DropResponse {
        changed: matches!(result, Rescheduled::Moved(_)),
        event: result.into_event(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{send, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    async fn create(app: &axum::Router, body: serde_json::Value) -> serde_json::Value {
        let (status, event) = send(app, "POST", "/calendars/personal/events", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        event
    }

    #[tokio::test]
    async fn create_read_update_delete() {
        let (_dir, app) = test_app();
        let event = create(
            &app,
            json!({ "title": "Dentist", "datetime": "2026-05-04T09:00:00Z", "location": "Main St" }),
        )
        .await;
        let id = event["id"].as_str().unwrap();
        let uri = format!("/calendars/personal/events/{}", id);

        let (status, fetched) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["time_status"], "STANDARD");
        assert_eq!(fetched["location"], "Main St");

        let (status, updated) = send(
            &app,
            "PATCH",
            &uri,
            Some(json!({ "title": "Orthodontist", "location": null })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], "Orthodontist");
        assert!(updated.get("location").is_none());

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_filters_by_day() {
        let (_dir, app) = test_app();
        create(&app, json!({ "title": "A", "datetime": "2026-05-04T09:00:00Z" })).await;
        create(&app, json!({ "title": "B", "datetime": "2026-05-05T09:00:00Z" })).await;

        let (_, all) = send(&app, "GET", "/calendars/personal/events", None).await;
        assert_eq!(all.as_array().unwrap().len(), 2);

        let (_, one) = send(
            &app,
            "GET",
            "/calendars/personal/events?from=2026-05-05&to=2026-05-05",
            None,
        )
        .await;
        assert_eq!(one.as_array().unwrap().len(), 1);
        assert_eq!(one[0]["title"], "B");
    }

    #[tokio::test]
    async fn drop_moves_and_reports_no_ops() {
        let (_dir, app) = test_app();
        let event = create(
            &app,
            json!({ "title": "Call", "datetime": "2026-05-04T12:00:00Z", "time_status": "NO_TIME" }),
        )
        .await;
        let uri = format!("/calendars/personal/events/{}/drop", event["id"].as_str().unwrap());

        let (status, moved) = send(&app, "POST", &uri, Some(json!({ "target": "14:30", "date": "2026-05-06" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(moved["changed"], true);
        assert_eq!(moved["event"]["time_status"], "STANDARD");
        assert_eq!(moved["event"]["datetime"], "2026-05-06T14:30:00Z");

        let (_, again) = send(&app, "POST", &uri, Some(json!({ "target": "14:30", "date": "2026-05-06" }))).await;
        assert_eq!(again["changed"], false);

        let (_, bucket) = send(&app, "POST", &uri, Some(json!({ "target": "ALL_DAY", "date": "2026-05-07" }))).await;
        assert_eq!(bucket["event"]["time_status"], "ALL_DAY");
        assert_eq!(bucket["event"]["datetime"], "2026-05-07T12:00:00Z");
    }

    #[tokio::test]
    async fn malformed_drop_targets_are_rejected() {
        let (_dir, app) = test_app();
        let event = create(&app, json!({ "title": "Call", "datetime": "2026-05-04T12:00:00Z" })).await;
        let uri = format!("/calendars/personal/events/{}/drop", event["id"].as_str().unwrap());

        for target in ["9:00", "25:00", "LATER"] {
            let (status, body) = send(&app, "POST", &uri, Some(json!({ "target": target, "date": "2026-05-06" }))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "target {}", target);
            assert!(body["error"].is_string());
        }
    }
}
