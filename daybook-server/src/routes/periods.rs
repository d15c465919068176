//! Period endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use chrono::NaiveDate;
use daybook_core::period::Period;
use serde::Deserialize;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calendars/{slug}/periods", get(list_periods).post(create_period))
        .route("/calendars/{slug}/periods/{id}", delete(delete_period))
}

async fn list_periods(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Period>>, AppError> {
    Ok(Json(state.calendar(&slug)?.periods()?))
}

#[derive(Deserialize)]
pub struct CreatePeriodRequest {
    pub name: String,
    pub start: NaiveDate,
    /// Inclusive
    pub end: NaiveDate,
    pub category_id: Option<String>,
}

async fn create_period(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<CreatePeriodRequest>,
) -> Result<(StatusCode, Json<Period>), AppError> {
    let calendar = state.calendar(&slug)?;

    let mut period = Period::new(req.name, req.start, req.end)?;
    period.category_id = req.category_id;

    Ok((StatusCode::CREATED, Json(calendar.add_period(period)?)))
}

async fn delete_period(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state.calendar(&slug)?.delete_period(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{send, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn periods_show_up_in_the_day_view() {
        let (_dir, app) = test_app();

        let (status, period) = send(
            &app,
            "POST",
            "/calendars/personal/periods",
            Some(json!({ "name": "Holiday", "start": "2026-08-01", "end": "2026-08-14" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, day) = send(&app, "GET", "/calendars/personal/days/2026-08-14", None).await;
        assert_eq!(day["periods"][0]["name"], "Holiday");
        let (_, day) = send(&app, "GET", "/calendars/personal/days/2026-08-15", None).await;
        assert!(day["periods"].as_array().unwrap().is_empty());

        let uri = format!("/calendars/personal/periods/{}", period["id"].as_str().unwrap());
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn end_before_start_is_rejected() {
        let (_dir, app) = test_app();
        let (status, _) = send(
            &app,
            "POST",
            "/calendars/personal/periods",
            Some(json!({ "name": "Oops", "start": "2026-08-14", "end": "2026-08-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
