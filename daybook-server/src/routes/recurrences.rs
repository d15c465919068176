//! Recurrence endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
};
use chrono::{DateTime, Utc};
use daybook_core::recurrence::{RecurrenceRequest, RecurrenceRule};
use serde::{Deserialize, Serialize};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/calendars/{slug}/recurrences",
            get(list_recurrences).post(create_recurrence),
        )
        .route("/calendars/{slug}/recurrences/{id}", delete(delete_recurrence))
}

#[derive(Serialize)]
pub struct RecurrenceInfo {
    #[serde(flatten)]
    pub rule: RecurrenceRule,
    /// Latest start among the rule's remaining events
    pub live_end: Option<DateTime<Utc>>,
}

/// GET /calendars/{slug}/recurrences
async fn list_recurrences(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<RecurrenceInfo>>, AppError> {
    let calendar = state.calendar(&slug)?;
    let events = calendar.events()?;

    let rules = calendar
        .recurrences()?
        .into_iter()
        .map(|rule| RecurrenceInfo {
            live_end: rule.live_end(&events),
            rule,
        })
        .collect();

    Ok(Json(rules))
}

#[derive(Serialize)]
pub struct CreatedRecurrence {
    pub rule: RecurrenceRule,
    pub count: usize,
    pub recurrence_end: Option<DateTime<Utc>>,
}

/// POST /calendars/{slug}/recurrences - Expand a rule and write its events
async fn create_recurrence(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<RecurrenceRequest>,
) -> Result<(StatusCode, Json<CreatedRecurrence>), AppError> {
    let calendar = state.calendar(&slug)?;

    if let Some(category_id) = &req.template.category_id {
        calendar.category(category_id)?;
    }

    let (rule, expansion) = calendar.create_recurrence(req, &state.daybook().tz())?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedRecurrence {
            count: expansion.count(),
            recurrence_end: rule.recurrence_end,
            rule,
        }),
    ))
}

#[derive(Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub with_events: bool,
}

#[derive(Serialize)]
pub struct DeletedRecurrence {
    pub deleted_events: usize,
}

/// DELETE /calendars/{slug}/recurrences/{id}?with_events=true
async fn delete_recurrence(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<DeletedRecurrence>, AppError> {
    let deleted_events = state
        .calendar(&slug)?
        .delete_recurrence(&id, query.with_events)?;

    Ok(Json(DeletedRecurrence { deleted_events }))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{send, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    fn monthly(count: u32) -> serde_json::Value {
        json!({
            "anchor": "2026-01-31T10:00:00Z",
            "interval": "month",
            "occurrence_count": count,
            "template": { "title": "Rent", "duration_minutes": 30 }
        })
    }

    #[tokio::test]
    async fn creates_and_clamps_month_ends() {
        let (_dir, app) = test_app();

        let (status, created) = send(&app, "POST", "/calendars/personal/recurrences", Some(monthly(4))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["count"], 4);
        assert_eq!(created["recurrence_end"], "2026-04-30T10:00:00Z");

        let (_, events) = send(&app, "GET", "/calendars/personal/events", None).await;
        let starts: Vec<&str> = events
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["datetime"].as_str().unwrap())
            .collect();
        assert_eq!(
            starts,
            vec![
                "2026-01-31T10:00:00Z",
                "2026-02-28T10:00:00Z",
                "2026-03-31T10:00:00Z",
                "2026-04-30T10:00:00Z"
            ]
        );
        assert_eq!(events[1]["end_datetime"], "2026-02-28T10:30:00Z");
    }

    #[tokio::test]
    async fn out_of_range_counts_are_rejected() {
        let (_dir, app) = test_app();

        for count in [0, 366] {
            let (status, _) = send(&app, "POST", "/calendars/personal/recurrences", Some(monthly(count))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }

        let (_, rules) = send(&app, "GET", "/calendars/personal/recurrences", None).await;
        assert!(rules.as_array().unwrap().is_empty());
        let (_, events) = send(&app, "GET", "/calendars/personal/events", None).await;
        assert!(events.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_with_events() {
        let (_dir, app) = test_app();
        let (_, created) = send(&app, "POST", "/calendars/personal/recurrences", Some(monthly(3))).await;
        let id = created["rule"]["id"].as_str().unwrap();

        let (_, listed) = send(&app, "GET", "/calendars/personal/recurrences", None).await;
        assert_eq!(listed[0]["live_end"], "2026-03-31T10:00:00Z");

        let (status, deleted) = send(
            &app,
            "DELETE",
            &format!("/calendars/personal/recurrences/{}?with_events=true", id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["deleted_events"], 3);

        let (_, events) = send(&app, "GET", "/calendars/personal/events", None).await;
        assert!(events.as_array().unwrap().is_empty());
    }
}
